//! Plain-text rendering of turns for the terminal.

use lightnavi_core::message::{Role, Turn};

fn prefix(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}

/// Render one turn: its text, the reasoning section, and the first
/// `candidate_limit` candidates.
pub fn render_turn(turn: &Turn, candidate_limit: usize) -> String {
    let mut out = String::new();
    let label = prefix(turn.role);

    for line in turn.text.lines() {
        out.push_str(&format!("  {label} > {line}\n"));
    }

    if let Some(reasoning) = turn.reasoning.as_deref().filter(|r| !r.is_empty()) {
        out.push_str("\n  思考プロセス:\n");
        for line in reasoning.lines() {
            out.push_str(&format!("    {line}\n"));
        }
    }

    let candidates = turn.top_candidates(candidate_limit);
    if !candidates.is_empty() {
        out.push_str("\n  候補機種:\n");
        for (i, c) in candidates.iter().enumerate() {
            out.push_str(&format!("    {}. {}\n", i + 1, c.name));
            out.push_str(&format!("       {} - {}\n", c.manufacturer, c.series));
        }
    }

    out
}
