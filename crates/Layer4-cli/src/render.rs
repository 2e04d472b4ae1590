//! Terminal rendering for decisions

use forgeguard_core::{Classification, DecisionKind, PermissionCheckResult, SessionSummary};

/// Exit code for a decision: 0 allow, 1 block, 2 prompt
pub fn exit_code(result: &PermissionCheckResult) -> u8 {
    match result.kind() {
        DecisionKind::Allow => 0,
        DecisionKind::Block => 1,
        DecisionKind::Prompt => 2,
    }
}

/// One-line decision, e.g. `✗ BLOCK  Fork bomb`
pub fn decision_line(result: &PermissionCheckResult) -> String {
    let (icon, label) = match result.kind() {
        DecisionKind::Allow => ("✓", "ALLOW"),
        DecisionKind::Block => ("✗", "BLOCK"),
        DecisionKind::Prompt => ("?", "PROMPT"),
    };
    match result.reason() {
        Some(reason) => format!("{} {:<7}{}", icon, label, reason),
        None => format!("{} {}", icon, label),
    }
}

pub fn decision_json(result: &PermissionCheckResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn classification_lines(report: &Classification) -> Vec<String> {
    let mut lines = vec![format!("Normalized:     {}", report.normalized)];

    lines.push(format!(
        "Always-blocked: {}",
        report.always_blocked.unwrap_or("no")
    ));
    lines.push(format!(
        "Construct:      {}",
        report.construct.map(|c| c.reason()).unwrap_or("none")
    ));
    lines.push(format!(
        "Compound:       {}",
        match (report.compound, report.unterminated_quote) {
            (_, true) => "yes (unterminated quote)",
            (true, false) => "yes",
            (false, false) => "no",
        }
    ));

    if report.segments.is_empty() {
        lines.push("Segments:       (empty)".to_string());
    } else {
        lines.push("Segments:".to_string());
        for segment in &report.segments {
            let verdict = match segment.read_only {
                Some(label) => format!("✓ read-only ({})", label),
                None => "✗ not allowlisted".to_string(),
            };
            lines.push(format!("  {:<40} {}", truncate(&segment.text, 40), verdict));
        }
    }

    lines
}

pub fn summary_line(summary: &SessionSummary) -> String {
    format!(
        "mode: {}  approved: {}  denied: {}  since: {}",
        summary.mode,
        summary.approved_count,
        summary.denied_count,
        summary.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Truncate on a char boundary for display
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgeguard_core::{classify, resolve_mode_config, PermissionMode};

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&PermissionCheckResult::allow()), 0);
        assert_eq!(exit_code(&PermissionCheckResult::block("no")), 1);
        assert_eq!(exit_code(&PermissionCheckResult::prompt("ask")), 2);
    }

    #[test]
    fn test_decision_line() {
        assert_eq!(decision_line(&PermissionCheckResult::allow()), "✓ ALLOW");
        assert_eq!(
            decision_line(&PermissionCheckResult::block("Fork bomb")),
            "✗ BLOCK  Fork bomb"
        );
        assert!(decision_line(&PermissionCheckResult::prompt("x")).starts_with("? PROMPT"));
    }

    #[test]
    fn test_decision_json() {
        let json = decision_json(&PermissionCheckResult::prompt("why")).unwrap();
        assert!(json.contains("\"requiresPrompt\": true"));
    }

    #[test]
    fn test_classification_lines() {
        let config = resolve_mode_config(PermissionMode::Safe);
        let lines = classification_lines(&classify("ls | rm x", &config));
        assert!(lines.iter().any(|l| l == "Compound:       yes"));
        assert!(lines.iter().any(|l| l.contains("read-only (file inspection)")));
        assert!(lines.iter().any(|l| l.contains("not allowlisted")));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("한글한글한글한글", 5), "한글...");
    }
}
