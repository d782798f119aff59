//! Scaffold plans: ordered, named steps over the engine operations.
//!
//! A step that depends on another step's effect (for example, copying a
//! file another step edits) declares it in `requires`. The plan checks those
//! declarations instead of trusting list order alone.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::domain::entities::{
    anchor::{Anchor, Pattern},
    common::{RelativePath, WriteOptions},
};
use crate::domain::error::DomainError;

/// One declarative engine call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Render a named template and materialize it.
    Template {
        template: String,
        destination: RelativePath,
        #[serde(skip)]
        options: WriteOptions,
    },
    /// Materialize literal content.
    CreateFile {
        path: RelativePath,
        #[serde(skip)]
        content: String,
        #[serde(skip)]
        options: WriteOptions,
    },
    /// Create a directory (no marker).
    EmptyDirectory { path: RelativePath },
    /// Create a directory and make sure it holds a `.keep` marker.
    Keep { path: RelativePath },
    /// Splice text at an anchor.
    Inject {
        path: RelativePath,
        anchor: Anchor,
        #[serde(skip)]
        text: String,
    },
    /// Global pattern substitution.
    ReplaceAll {
        path: RelativePath,
        pattern: Pattern,
        replacement: String,
    },
    /// Run one shell command from the project root.
    Run { command: String, allow_failure: bool },
}

impl Operation {
    /// The file or directory this operation touches, if any.
    pub fn target(&self) -> Option<&RelativePath> {
        match self {
            Self::Template { destination, .. } => Some(destination),
            Self::CreateFile { path, .. }
            | Self::EmptyDirectory { path }
            | Self::Keep { path }
            | Self::Inject { path, .. }
            | Self::ReplaceAll { path, .. } => Some(path),
            Self::Run { .. } => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template {
                template,
                destination,
                options,
            } => {
                write!(f, "template {template} -> {destination}")?;
                if options.force {
                    write!(f, " (force)")?;
                }
                Ok(())
            }
            Self::CreateFile { path, options, .. } => {
                write!(f, "create_file {path}")?;
                if options.force {
                    write!(f, " (force)")?;
                }
                Ok(())
            }
            Self::EmptyDirectory { path } => write!(f, "empty_directory {path}"),
            Self::Keep { path } => write!(f, "keep {path}"),
            Self::Inject { path, anchor, .. } => write!(f, "inject {path} {anchor}"),
            Self::ReplaceAll { path, pattern, .. } => write!(f, "gsub {path} {pattern}"),
            Self::Run {
                command,
                allow_failure,
            } => {
                write!(f, "run {command}")?;
                if *allow_failure {
                    write!(f, " (may fail)")?;
                }
                Ok(())
            }
        }
    }
}

/// A named group of operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    name: String,
    requires: Vec<String>,
    operations: Vec<Operation>,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Declare a step that must run earlier in the plan.
    pub fn requires(mut self, step: impl Into<String>) -> Self {
        self.requires.push(step.into());
        self
    }

    pub fn operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    pub fn template(self, template: impl Into<String>, destination: impl Into<RelativePath>) -> Self {
        self.operation(Operation::Template {
            template: template.into(),
            destination: destination.into(),
            options: WriteOptions::new(),
        })
    }

    pub fn template_forced(
        self,
        template: impl Into<String>,
        destination: impl Into<RelativePath>,
    ) -> Self {
        self.operation(Operation::Template {
            template: template.into(),
            destination: destination.into(),
            options: WriteOptions::forced(),
        })
    }

    pub fn create_file(self, path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        self.operation(Operation::CreateFile {
            path: path.into(),
            content: content.into(),
            options: WriteOptions::new(),
        })
    }

    pub fn empty_directory(self, path: impl Into<RelativePath>) -> Self {
        self.operation(Operation::EmptyDirectory { path: path.into() })
    }

    pub fn keep(self, path: impl Into<RelativePath>) -> Self {
        self.operation(Operation::Keep { path: path.into() })
    }

    pub fn inject(self, path: impl Into<RelativePath>, anchor: Anchor, text: impl Into<String>) -> Self {
        self.operation(Operation::Inject {
            path: path.into(),
            anchor,
            text: text.into(),
        })
    }

    pub fn replace_all(
        self,
        path: impl Into<RelativePath>,
        pattern: Pattern,
        replacement: impl Into<String>,
    ) -> Self {
        self.operation(Operation::ReplaceAll {
            path: path.into(),
            pattern,
            replacement: replacement.into(),
        })
    }

    pub fn run(self, command: impl Into<String>) -> Self {
        self.operation(Operation::Run {
            command: command.into(),
            allow_failure: false,
        })
    }

    /// Run a command whose non-zero exit is recorded but does not stop the plan.
    pub fn run_allowing_failure(self, command: impl Into<String>) -> Self {
        self.operation(Operation::Run {
            command: command.into(),
            allow_failure: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.requires
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

/// Ordered list of steps for one scaffolding run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScaffoldPlan {
    steps: Vec<Step>,
}

impl ScaffoldPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total number of operations across all steps.
    pub fn operation_count(&self) -> usize {
        self.steps.iter().map(|s| s.operations.len()).sum()
    }

    /// Check step names are unique and every declared prerequisite exists
    /// and comes earlier.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut index = HashMap::with_capacity(self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            if index.insert(step.name.as_str(), i).is_some() {
                return Err(DomainError::DuplicateStep {
                    name: step.name.clone(),
                });
            }
        }

        for (i, step) in self.steps.iter().enumerate() {
            for required in &step.requires {
                match index.get(required.as_str()) {
                    None => {
                        return Err(DomainError::UnknownPrerequisite {
                            step: step.name.clone(),
                            requires: required.clone(),
                        });
                    }
                    Some(&j) if j >= i => {
                        return Err(DomainError::OrderViolation {
                            step: step.name.clone(),
                            requires: required.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Drop the named steps.
    ///
    /// Fails if a name is unknown or a remaining step requires a dropped one.
    pub fn without<S: AsRef<str>>(self, names: &[S]) -> Result<Self, DomainError> {
        let skip: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();

        if let Some(unknown) = skip.iter().find(|n| self.step(n).is_none()) {
            return Err(DomainError::UnknownStep {
                name: (*unknown).to_string(),
            });
        }

        for step in self.steps.iter().filter(|s| !skip.contains(s.name.as_str())) {
            if let Some(required) = step.requires.iter().find(|r| skip.contains(r.as_str())) {
                return Err(DomainError::SkippedPrerequisite {
                    step: step.name.clone(),
                    requires: required.clone(),
                });
            }
        }

        Ok(Self {
            steps: self
                .steps
                .into_iter()
                .filter(|s| !skip.contains(s.name.as_str()))
                .collect(),
        })
    }
}
