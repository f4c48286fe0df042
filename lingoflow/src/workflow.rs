//! Translation review lifecycle.
//!
//! ```text
//! draft --submit--> review --approve--> approved
//!   ^                  |
//!   +------reject------+
//! ```
//!
//! [`next_state`] only knows the graph. Whether an actor may take an edge is
//! answered by the guard predicates (`can_*`), which the caller must check
//! first; [`decide`] does both for one request.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Lifecycle state of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationState {
    /// Being written; only its author (or an admin) edits it.
    #[default]
    Draft,
    /// Submitted and waiting for a reviewer.
    Review,
    /// Accepted by a reviewer or admin.
    Approved,
}

/// Who is acting. Supplied by the caller on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Translator,
    Reviewer,
}

/// A requested lifecycle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Submit,
    Approve,
    Reject,
}

impl Display for TranslationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationState::Draft => write!(f, "draft"),
            TranslationState::Review => write!(f, "review"),
            TranslationState::Approved => write!(f, "approved"),
        }
    }
}

impl FromStr for TranslationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(TranslationState::Draft),
            "review" => Ok(TranslationState::Review),
            "approved" => Ok(TranslationState::Approved),
            _ => Err(format!("Unknown translation state: {}", s)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Translator => write!(f, "translator"),
            Role::Reviewer => write!(f, "reviewer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "translator" => Ok(Role::Translator),
            "reviewer" => Ok(Role::Reviewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Submit => write!(f, "submit"),
            Action::Approve => write!(f, "approve"),
            Action::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submit" => Ok(Action::Submit),
            "approve" => Ok(Action::Approve),
            "reject" => Ok(Action::Reject),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// The state `action` leads to from `state`.
///
/// Pairs outside the lifecycle graph return `state` unchanged; this function
/// never checks permissions.
pub fn next_state(state: TranslationState, action: Action) -> TranslationState {
    match (state, action) {
        (TranslationState::Draft, Action::Submit) => TranslationState::Review,
        (TranslationState::Review, Action::Approve) => TranslationState::Approved,
        (TranslationState::Review, Action::Reject) => TranslationState::Draft,
        (state, _) => state,
    }
}

/// Every role may create translations.
pub fn can_create_translation(role: Role) -> bool {
    match role {
        Role::Admin | Role::Translator | Role::Reviewer => true,
    }
}

/// Admins edit anything; authors edit their own drafts; reviewers edit
/// anything under review.
pub fn can_edit_translation(
    role: Role,
    state: TranslationState,
    created_by: &str,
    acting_user: &str,
) -> bool {
    match (role, state) {
        (Role::Admin, _) => true,
        (_, TranslationState::Draft) if acting_user == created_by => true,
        (Role::Reviewer, TranslationState::Review) => true,
        _ => false,
    }
}

pub fn can_review_translation(role: Role) -> bool {
    match role {
        Role::Admin | Role::Reviewer => true,
        Role::Translator => false,
    }
}

pub fn can_approve_translation(role: Role, state: TranslationState) -> bool {
    match (role, state) {
        (Role::Admin, _) => true,
        (Role::Reviewer, TranslationState::Review) => true,
        _ => false,
    }
}

/// Everything needed to judge one transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest<'a> {
    pub state: TranslationState,
    pub action: Action,
    pub role: Role,
    /// Author of the translation.
    pub created_by: &'a str,
    /// User asking for the transition.
    pub acting_user: &'a str,
}

/// Why a request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The action does not lead anywhere from the current state.
    IllegalTransition,
    /// The guard for the action rejected this actor.
    NotPermitted,
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::IllegalTransition => write!(f, "illegal transition"),
            DenialReason::NotPermitted => write!(f, "not permitted"),
        }
    }
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Decision {
    Allowed {
        from: TranslationState,
        to: TranslationState,
    },
    Denied {
        reason: DenialReason,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

/// Checks the guard that governs `request.action` and, if it passes, computes
/// the next state.
///
/// - `submit` moves the author's own draft (or any draft, for admins) to review.
/// - `approve` follows [`can_approve_translation`].
/// - `reject` follows [`can_review_translation`].
pub fn decide(request: &TransitionRequest<'_>) -> Decision {
    let to = next_state(request.state, request.action);
    if to == request.state {
        return Decision::Denied {
            reason: DenialReason::IllegalTransition,
        };
    }

    let permitted = match request.action {
        Action::Submit => can_edit_translation(
            request.role,
            request.state,
            request.created_by,
            request.acting_user,
        ),
        Action::Approve => can_approve_translation(request.role, request.state),
        Action::Reject => can_review_translation(request.role),
    };

    if permitted {
        Decision::Allowed {
            from: request.state,
            to,
        }
    } else {
        Decision::Denied {
            reason: DenialReason::NotPermitted,
        }
    }
}
