use crate::domain::{Area, FocusKind, Goal, Mission, Note, Project, Subproject, Task, Theme};
use crate::persistence::Snapshot;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

/// Parameters for starting a focus session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRequest {
    /// Minutes
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: FocusKind,
}

/// Every state transition the engine understands.
///
/// Serialized adjacently tagged, e.g. `{"type": "ADD_XP", "payload": 50}`.
/// Kinds this build does not know decode to [`Action::Unknown`] whether or
/// not they carry a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    LoadState(Box<Snapshot>),

    AddNote(Note),
    UpdateNote(Note),
    DeleteNote(String),

    AddTask(Task),
    UpdateTask(Task),
    DeleteTask(String),
    CompleteTask(String),

    UpdateMission(Mission),

    StartFocusSession(FocusRequest),
    EndFocusSession,

    AddXp(u32),
    ToggleTheme,

    AddArea(Area),
    UpdateArea(Area),
    DeleteArea(String),

    AddTheme(Theme),
    UpdateTheme(Theme),
    DeleteTheme(String),

    AddGoal(Goal),
    UpdateGoal(Goal),
    DeleteGoal(String),

    AddProject(Project),
    UpdateProject(Project),
    DeleteProject(String),

    AddSubproject(Subproject),
    UpdateSubproject(Subproject),
    DeleteSubproject(String),

    /// Any action kind this build does not recognise
    #[serde(other)]
    Unknown,
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Action::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let err = match Action::deserialize(value.clone()) {
            Ok(action) => return Ok(action),
            Err(err) => err,
        };

        // `#[serde(other)]` only matches a bare tag, so retry without the payload
        match value.get("type") {
            Some(kind) => match Action::deserialize(json!({ "type": kind })) {
                Ok(Action::Unknown) => Ok(Action::Unknown),
                _ => Err(D::Error::custom(err)),
            },
            None => Err(D::Error::custom(err)),
        }
    }
}

impl Action {
    /// Wire name of the action, e.g. "COMPLETE_TASK"
    pub fn kind(&self) -> &'static str {
        match self {
            Action::LoadState(_) => "LOAD_STATE",
            Action::AddNote(_) => "ADD_NOTE",
            Action::UpdateNote(_) => "UPDATE_NOTE",
            Action::DeleteNote(_) => "DELETE_NOTE",
            Action::AddTask(_) => "ADD_TASK",
            Action::UpdateTask(_) => "UPDATE_TASK",
            Action::DeleteTask(_) => "DELETE_TASK",
            Action::CompleteTask(_) => "COMPLETE_TASK",
            Action::UpdateMission(_) => "UPDATE_MISSION",
            Action::StartFocusSession(_) => "START_FOCUS_SESSION",
            Action::EndFocusSession => "END_FOCUS_SESSION",
            Action::AddXp(_) => "ADD_XP",
            Action::ToggleTheme => "TOGGLE_THEME",
            Action::AddArea(_) => "ADD_AREA",
            Action::UpdateArea(_) => "UPDATE_AREA",
            Action::DeleteArea(_) => "DELETE_AREA",
            Action::AddTheme(_) => "ADD_THEME",
            Action::UpdateTheme(_) => "UPDATE_THEME",
            Action::DeleteTheme(_) => "DELETE_THEME",
            Action::AddGoal(_) => "ADD_GOAL",
            Action::UpdateGoal(_) => "UPDATE_GOAL",
            Action::DeleteGoal(_) => "DELETE_GOAL",
            Action::AddProject(_) => "ADD_PROJECT",
            Action::UpdateProject(_) => "UPDATE_PROJECT",
            Action::DeleteProject(_) => "DELETE_PROJECT",
            Action::AddSubproject(_) => "ADD_SUBPROJECT",
            Action::UpdateSubproject(_) => "UPDATE_SUBPROJECT",
            Action::DeleteSubproject(_) => "DELETE_SUBPROJECT",
            Action::Unknown => "UNKNOWN",
        }
    }
}
