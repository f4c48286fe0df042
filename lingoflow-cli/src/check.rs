use lingoflow::{Action, Decision, Role, TransitionRequest, TranslationState, decide};

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub state: String,
    pub action: String,
    pub role: String,
    pub author: String,
    pub actor: String,
}

/// Parses the request and runs it through the workflow guards.
pub fn evaluate(options: &CheckOptions) -> Result<Decision, String> {
    let state: TranslationState = options.state.parse()?;
    let action: Action = options.action.parse()?;
    let role: Role = options.role.parse()?;

    Ok(decide(&TransitionRequest {
        state,
        action,
        role,
        created_by: &options.author,
        acting_user: &options.actor,
    }))
}

pub fn describe(decision: &Decision) -> String {
    match decision {
        Decision::Allowed { from, to } => format!("allowed: {} -> {}", from, to),
        Decision::Denied { reason } => format!("denied: {}", reason),
    }
}

/// Prints the decision and reports whether the transition is allowed.
pub fn run_check_command(options: &CheckOptions, json_output: bool) -> Result<bool, String> {
    let decision = evaluate(options)?;
    if json_output {
        let out = serde_json::to_string_pretty(&decision).map_err(|e| e.to_string())?;
        println!("{}", out);
    } else {
        println!("{}", describe(&decision));
    }
    Ok(decision.is_allowed())
}
