use ledgerguard_types::{ExecutionReport, RuleStatus};

/// Render a report as a Markdown summary for PR comments and job logs.
pub fn render_markdown(report: &ExecutionReport) -> String {
    let r = &report.result;
    let mut out = String::new();

    out.push_str("# Ledgerguard report\n\n");
    out.push_str(&format!(
        "- Subject: `{}` ({})\n- Status: **{}**\n- Risk: **{}** ({}/100)\n- Rules: {} total, {} triggered, {} failed, {} skipped\n\n",
        r.subject_id,
        r.period,
        r.status,
        r.risk_level,
        r.risk_score,
        r.summary.total_rules,
        r.summary.triggered_rules,
        r.summary.failed_rules,
        r.summary.skipped_rules,
    ));

    let triggered: Vec<_> = r.triggered().collect();
    if triggered.is_empty() {
        out.push_str("No findings.\n");
    } else {
        out.push_str("## Findings\n\n");
        for result in triggered {
            let Some(f) = &result.finding else { continue };
            out.push_str(&format!(
                "- [{}] `{}`: {}\n  - {}\n",
                f.severity.as_str().to_ascii_uppercase(),
                result.rule_id,
                f.title,
                f.summary
            ));
            for action in &f.actions {
                out.push_str(&format!(
                    "  - action ({}): {}\n",
                    action.assignee_role, action.description
                ));
            }
        }
    }

    let problems: Vec<_> = r
        .rule_results()
        .filter(|x| matches!(x.status, RuleStatus::Failed | RuleStatus::Skipped))
        .collect();
    if !problems.is_empty() {
        out.push_str("\n## Not evaluated\n\n");
        for result in problems {
            let reason = result
                .error
                .as_deref()
                .or(result.skip_reason.as_deref())
                .unwrap_or("");
            out.push_str(&format!(
                "- [{}] `{}`: {}\n",
                result.status, result.rule_id, reason
            ));
        }
    }

    out
}
