//! Project-level debugger breakpoints.

use serde::Serialize;

use crate::decode::Fields;
use crate::error::{ModelError, ModelResult};
use crate::literal::literal_enum;

literal_enum! {
    /// Breakpoint kinds, as written in the `type` field.
    pub enum BreakpointType {
        /// File and line.
        File => "File",
        /// Thrown exceptions.
        Exception => "Exception",
        /// Swift errors.
        SwiftError => "SwiftError",
        /// OpenGL errors.
        OpenGlError => "OpenGLError",
        /// Symbolic breakpoints.
        Symbolic => "Symbolic",
        /// Auto Layout constraint errors.
        IdeConstraintError => "IDEConstraintError",
        /// Test failures.
        IdeTestFailure => "IDETestFailure",
        /// Runtime issues.
        RuntimeIssue => "RuntimeIssue",
    }
}

literal_enum! {
    /// Exception languages an exception breakpoint stops on.
    pub enum ExceptionScope {
        /// Every language.
        All => "All",
        /// Objective-C exceptions.
        ObjectiveC => "Objective-C",
        /// C++ exceptions.
        Cpp => "C++",
    }
}

literal_enum! {
    /// When an exception breakpoint stops.
    pub enum StopOnStyle {
        /// On throw.
        Throw => "Throw",
        /// On catch.
        Catch => "Catch",
    }
}

literal_enum! {
    /// Breakpoint action kinds.
    pub enum BreakpointActionType {
        /// Debugger command.
        DebuggerCommand => "DebuggerCommand",
        /// Log message.
        Log => "Log",
        /// Shell command.
        ShellCommand => "ShellCommand",
        /// GPU trace capture.
        GraphicsTrace => "GraphicsTrace",
        /// AppleScript.
        AppleScript => "AppleScript",
        /// Play a sound.
        Sound => "Sound",
    }
}

literal_enum! {
    /// How a log action emits its message.
    pub enum ConveyanceType {
        /// Print to the console.
        Console => "console",
        /// Speak the message.
        Speak => "speak",
    }
}

literal_enum! {
    /// System sounds a sound action can play.
    pub enum SoundName {
        /// Basso.
        Basso => "Basso",
        /// Blow.
        Blow => "Blow",
        /// Bottle.
        Bottle => "Bottle",
        /// Frog.
        Frog => "Frog",
        /// Funk.
        Funk => "Funk",
        /// Glass.
        Glass => "Glass",
        /// Hero.
        Hero => "Hero",
        /// Morse.
        Morse => "Morse",
        /// Ping.
        Ping => "Ping",
        /// Pop.
        Pop => "Pop",
        /// Purr.
        Purr => "Purr",
        /// Sosumi.
        Sosumi => "Sosumi",
        /// Submarine.
        Submarine => "Submarine",
        /// Tink.
        Tink => "Tink",
    }
}

/// Kind-specific data of a breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BreakpointKind {
    /// Stops at a file location.
    File {
        /// Source file.
        path: String,
        /// Line number.
        line: i64,
        /// Column number.
        column: Option<i64>,
    },
    /// Stops on exceptions.
    Exception {
        /// Languages.
        scope: ExceptionScope,
        /// Throw or catch.
        stop_on_style: StopOnStyle,
    },
    /// Stops on Swift errors.
    SwiftError,
    /// Stops on OpenGL errors.
    OpenGlError,
    /// Stops on a symbol.
    Symbolic {
        /// Symbol name.
        symbol: Option<String>,
        /// Module name.
        module: Option<String>,
    },
    /// Stops on constraint errors.
    IdeConstraintError,
    /// Stops on test failures.
    IdeTestFailure,
    /// Stops on runtime issues.
    RuntimeIssue,
}

/// An action run when a breakpoint is hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BreakpointAction {
    /// Runs a debugger command.
    DebuggerCommand {
        /// Command text.
        command: Option<String>,
    },
    /// Logs a message.
    Log {
        /// Message text.
        message: Option<String>,
        /// Output channel.
        conveyance_type: ConveyanceType,
    },
    /// Runs a shell command.
    ShellCommand {
        /// Executable path.
        path: Option<String>,
        /// Arguments.
        arguments: Option<String>,
        /// Wait for completion.
        wait_until_done: bool,
    },
    /// Captures a GPU frame.
    GraphicsTrace,
    /// Runs an AppleScript.
    AppleScript {
        /// Script text.
        script: Option<String>,
    },
    /// Plays a sound.
    Sound {
        /// Sound name.
        sound: SoundName,
    },
}

impl BreakpointAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let action_type = fields
            .literal("type", BreakpointActionType::from_literal, |path, value| {
                ModelError::UnknownBreakpointActionType { path, value }
            })?
            .ok_or_else(|| ModelError::MissingField {
                path: fields.field_path("type"),
            })?;

        Ok(match action_type {
            BreakpointActionType::DebuggerCommand => Self::DebuggerCommand {
                command: fields.string("command")?,
            },
            BreakpointActionType::Log => Self::Log {
                message: fields.string("message")?,
                conveyance_type: fields
                    .enumeration("conveyanceType", "conveyance type", ConveyanceType::from_literal)?
                    .unwrap_or(ConveyanceType::Console),
            },
            BreakpointActionType::ShellCommand => Self::ShellCommand {
                path: fields.string("path")?,
                arguments: fields.string("arguments")?,
                wait_until_done: fields.bool_or("waitUntilDone", false)?,
            },
            BreakpointActionType::GraphicsTrace => Self::GraphicsTrace,
            BreakpointActionType::AppleScript => Self::AppleScript {
                script: fields.string("script")?,
            },
            BreakpointActionType::Sound => Self::Sound {
                sound: fields
                    .enumeration("sound", "sound name", SoundName::from_literal)?
                    .unwrap_or(SoundName::Basso),
            },
        })
    }
}

/// A breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    /// Kind and kind-specific data.
    #[serde(flatten)]
    pub kind: BreakpointKind,
    /// Whether the breakpoint is enabled.
    pub enabled: bool,
    /// Hits ignored before stopping.
    pub ignore_count: i64,
    /// Continue after running actions.
    pub continue_after_running_actions: bool,
    /// Condition expression.
    pub condition: Option<String>,
    /// Actions run when hit.
    pub actions: Vec<BreakpointAction>,
}

impl Breakpoint {
    /// An enabled breakpoint with no actions.
    #[must_use]
    pub const fn new(kind: BreakpointKind) -> Self {
        Self {
            kind,
            enabled: true,
            ignore_count: 0,
            continue_after_running_actions: false,
            condition: None,
            actions: Vec::new(),
        }
    }

    /// Decodes one breakpoint map, dispatching on `type`.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let breakpoint_type = fields
            .literal("type", BreakpointType::from_literal, |path, value| {
                ModelError::UnknownBreakpointType { path, value }
            })?
            .ok_or_else(|| ModelError::MissingField {
                path: fields.field_path("type"),
            })?;

        let kind = match breakpoint_type {
            BreakpointType::File => BreakpointKind::File {
                path: fields.required_string("path")?,
                line: fields.int("line")?.ok_or_else(|| ModelError::MissingField {
                    path: fields.field_path("line"),
                })?,
                column: fields.int("column")?,
            },
            BreakpointType::Exception => BreakpointKind::Exception {
                scope: fields
                    .enumeration("scope", "breakpoint scope", ExceptionScope::from_literal)?
                    .unwrap_or(ExceptionScope::ObjectiveC),
                stop_on_style: fields
                    .enumeration("stopOnStyle", "stop on style", StopOnStyle::from_literal)?
                    .unwrap_or(StopOnStyle::Throw),
            },
            BreakpointType::SwiftError => BreakpointKind::SwiftError,
            BreakpointType::OpenGlError => BreakpointKind::OpenGlError,
            BreakpointType::Symbolic => BreakpointKind::Symbolic {
                symbol: fields.string("symbol")?,
                module: fields.string("module")?,
            },
            BreakpointType::IdeConstraintError => BreakpointKind::IdeConstraintError,
            BreakpointType::IdeTestFailure => BreakpointKind::IdeTestFailure,
            BreakpointType::RuntimeIssue => BreakpointKind::RuntimeIssue,
        };

        Ok(Self {
            kind,
            enabled: fields.bool_or("enabled", true)?,
            ignore_count: fields.int("ignoreCount")?.unwrap_or(0),
            continue_after_running_actions: fields.bool_or("continueAfterRunningActions", false)?,
            condition: fields.string("condition")?,
            actions: fields
                .maps("actions")?
                .iter()
                .map(BreakpointAction::decode)
                .collect::<ModelResult<_>>()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::{doc, seq};
    use pretty_assertions::assert_eq;

    fn decode(document: &Document) -> ModelResult<Breakpoint> {
        Breakpoint::decode(&Fields::new(document, "breakpoints[0]"))
    }

    #[test]
    fn test_exception_breakpoint_with_actions() {
        let breakpoint = decode(&doc! {
            "type" => "Exception",
            "scope" => "All",
            "stopOnStyle" => "Catch",
            "actions" => seq![
                doc! { "type" => "Log", "message" => "hit", "conveyanceType" => "speak" },
                doc! { "type" => "Sound", "sound" => "Hero" },
                doc! { "type" => "GraphicsTrace" },
            ],
        })
        .unwrap();

        assert_eq!(
            breakpoint.kind,
            BreakpointKind::Exception {
                scope: ExceptionScope::All,
                stop_on_style: StopOnStyle::Catch
            }
        );
        assert!(breakpoint.enabled);
        assert_eq!(
            breakpoint.actions,
            vec![
                BreakpointAction::Log {
                    message: Some("hit".into()),
                    conveyance_type: ConveyanceType::Speak
                },
                BreakpointAction::Sound {
                    sound: SoundName::Hero
                },
                BreakpointAction::GraphicsTrace,
            ]
        );
    }

    #[test]
    fn test_file_breakpoint() {
        let breakpoint = decode(&doc! {
            "type" => "File",
            "path" => "Foo.swift",
            "line" => 7,
            "enabled" => false,
            "ignoreCount" => 2,
        })
        .unwrap();

        assert_eq!(
            breakpoint.kind,
            BreakpointKind::File {
                path: "Foo.swift".into(),
                line: 7,
                column: None
            }
        );
        assert!(!breakpoint.enabled);
        assert_eq!(breakpoint.ignore_count, 2);
    }

    fn literal_error(document: &Document) -> (String, &'static str, String) {
        match decode(document).unwrap_err() {
            ModelError::UnknownLiteral { path, kind, value } => (path, kind, value),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_literals() {
        assert_eq!(
            decode(&doc! { "type" => "Invalid" }),
            Err(ModelError::UnknownBreakpointType {
                path: "breakpoints[0].type".into(),
                value: "Invalid".into()
            })
        );
        assert_eq!(
            literal_error(&doc! { "type" => "Exception", "scope" => "Invalid" }).1,
            "breakpoint scope"
        );
        assert_eq!(
            literal_error(&doc! { "type" => "Exception", "stopOnStyle" => "Invalid" }).1,
            "stop on style"
        );
        assert_eq!(
            decode(&doc! { "type" => "File", "path" => "a", "line" => 1, "actions" => seq![doc! { "type" => "Invalid" }] }),
            Err(ModelError::UnknownBreakpointActionType {
                path: "breakpoints[0].actions[0].type".into(),
                value: "Invalid".into()
            })
        );
        assert_eq!(
            literal_error(&doc! { "type" => "SwiftError", "actions" => seq![doc! { "type" => "Log", "conveyanceType" => "shout" }] }).1,
            "conveyance type"
        );
        assert_eq!(
            literal_error(&doc! { "type" => "SwiftError", "actions" => seq![doc! { "type" => "Sound", "sound" => "Beep" }] }).1,
            "sound name"
        );
    }
}
