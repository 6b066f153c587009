use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a task mode, e.g. `RoutineAdd`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A property a task accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

impl PropertySpec {
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
        }
    }
}

/// What a task mode accepts: its command names (with descriptions), the
/// allowed actions and the declared properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub commands: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertySpec>>,
}

impl TaskConfig {
    #[must_use]
    pub fn with_command(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.commands.insert(name.into(), description.into());
        self
    }

    #[must_use]
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_property(mut self, spec: PropertySpec) -> Self {
        self.properties.get_or_insert_with(Vec::new).push(spec);
        self
    }

    /// Allowed actions; empty when the task takes none.
    pub fn actions(&self) -> &[String] {
        self.actions.as_deref().unwrap_or_default()
    }

    /// Declared properties; empty when the task declares none.
    pub fn properties(&self) -> &[PropertySpec] {
        self.properties.as_deref().unwrap_or_default()
    }

    pub fn has_command(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions().iter().any(|a| a == action)
    }

    pub fn declares_property(&self, name: &str) -> bool {
        self.properties().iter().any(|p| p.name == name)
    }

    /// The only command, when exactly one is configured.
    pub fn sole_command(&self) -> Option<&str> {
        match self.commands.len() {
            1 => self.commands.keys().next().map(String::as_str),
            _ => None,
        }
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &str> {
        self.properties()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
    }
}

/// A task mode paired with its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: TaskId,
    #[serde(flatten)]
    pub config: TaskConfig,
}

/// Read-only access to the task configuration of one language.
///
/// The engine never loads configuration itself; callers hand it whatever
/// catalog fits the conversation's language.
pub trait TaskCatalog {
    /// Maps a command and optional action to the task that handles them.
    fn resolve(&self, command: &str, action: Option<&str>) -> Option<TaskId>;

    /// Looks up the configuration of a task mode.
    fn task_config(&self, task: &TaskId) -> Option<&TaskConfig>;
}

/// In-memory [`TaskCatalog`] backed by an ordered list of task definitions.
///
/// Resolution picks the first task whose commands include the command and
/// whose actions are either empty or include the action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl Catalog {
    #[must_use]
    pub fn with_task(mut self, id: impl Into<String>, config: TaskConfig) -> Self {
        self.tasks.push(TaskDefinition {
            id: TaskId::new(id),
            config,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl TaskCatalog for Catalog {
    fn resolve(&self, command: &str, action: Option<&str>) -> Option<TaskId> {
        self.tasks
            .iter()
            .find(|t| {
                t.config.has_command(command)
                    && (t.config.actions().is_empty()
                        || action.is_some_and(|a| t.config.has_action(a)))
            })
            .map(|t| t.id.clone())
    }

    fn task_config(&self, task: &TaskId) -> Option<&TaskConfig> {
        self.tasks
            .iter()
            .find(|t| t.id == *task)
            .map(|t| &t.config)
    }
}

/// Describes a bracketed suggestion group such as `suggested: [/a, /b]`.
///
/// Without a delimiter a wrapper holds a single directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapper {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

impl Wrapper {
    pub const SUGGESTED: &'static str = "suggested";

    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            delimiter: None,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// `suggested: [...]` with comma separated directives.
    pub fn suggested() -> Self {
        Self::new(Self::SUGGESTED).with_delimiter(",")
    }
}
