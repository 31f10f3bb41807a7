use crate::commands::args::{ArgValue, ArgumentDef, true_action};
use crate::commands::command::{Command, CommandDef, CommandOutcome};
use crate::commands::context::{BufferRequest, ObjectKind};
use crate::commands::error::CommandError;
use crate::commands::types::{CommandCategory, CommandPriority};

use super::{command, display_buffer, selected_object};

pub static DISPLAY_INFO: CommandDef = command(
    "display-info",
    "Show details of the selected container or image.",
    CommandPriority::Frontend,
    CommandCategory::Inspection,
    run_display_info,
);

static LOGS_ARGUMENTS: &[ArgumentDef] = &[ArgumentDef {
    name: "follow",
    description: "Keep streaming new log lines.",
    aliases: &["-f"],
    default: ArgValue::Bool(false),
    action: true_action,
}];

pub static LOGS: CommandDef = CommandDef {
    arguments: LOGS_ARGUMENTS,
    ..command(
        "logs",
        "Display logs of the selected container.",
        CommandPriority::Frontend,
        CommandCategory::Inspection,
        run_logs,
    )
};

pub static INSPECT: CommandDef = command(
    "inspect",
    "Display raw inspect data of the selected object.",
    CommandPriority::Frontend,
    CommandCategory::Inspection,
    run_inspect,
);

fn run_display_info(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let target = selected_object(cmd)?.clone();
    display_buffer(cmd, BufferRequest::Info(target))
}

fn run_logs(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let target = selected_object(cmd)?.clone();
    if target.kind != ObjectKind::Container {
        return Err(CommandError::notify(format!(
            "Can't display logs of '{}', it is not a container.",
            target.name
        )));
    }
    let follow = cmd.arguments().flag("follow")?;
    display_buffer(cmd, BufferRequest::Logs { target, follow })
}

fn run_inspect(cmd: &Command) -> Result<CommandOutcome, CommandError> {
    let target = selected_object(cmd)?.clone();
    display_buffer(cmd, BufferRequest::Inspect(target))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::context::{CommandContext, ObjectRef};
    use crate::test_helpers::FakeUi;

    fn build(def: &'static CommandDef, ui: &Arc<FakeUi>, target: ObjectRef) -> Command {
        Command::new(
            def,
            CommandContext {
                ui: Some(ui.clone()),
                target: Some(target),
                ..Default::default()
            },
        )
    }

    #[test]
    fn follow_flag_reaches_the_buffer_request() {
        let ui = Arc::new(FakeUi::default());
        let web = ObjectRef::container("abc", "web");
        let mut cmd = build(&LOGS, &ui, web.clone());
        cmd.process_args(&["-f"]).unwrap();
        cmd.run().unwrap();
        assert_eq!(
            ui.requests(),
            vec![BufferRequest::Logs {
                target: web,
                follow: true
            }]
        );
        assert_eq!(ui.displayed(), vec!["logs web"]);
    }

    #[test]
    fn logs_of_an_image_is_refused() {
        let ui = Arc::new(FakeUi::default());
        let err = build(&LOGS, &ui, ObjectRef::image("sha", "fedora")).run().unwrap_err();
        assert!(err.is_notify());
        assert!(ui.requests().is_empty());
    }

    #[test]
    fn info_and_inspect_open_buffers() {
        let ui = Arc::new(FakeUi::default());
        let fedora = ObjectRef::image("sha", "fedora");
        build(&DISPLAY_INFO, &ui, fedora.clone()).run().unwrap();
        build(&INSPECT, &ui, fedora.clone()).run().unwrap();
        assert_eq!(
            ui.requests(),
            vec![BufferRequest::Info(fedora.clone()), BufferRequest::Inspect(fedora)]
        );
    }

    #[test]
    fn buffer_factory_errors_propagate() {
        let ui = Arc::new(FakeUi::default());
        ui.refuse_buffers("no such image");
        let err = build(&INSPECT, &ui, ObjectRef::image("sha", "gone")).run().unwrap_err();
        assert_eq!(err, CommandError::notify("no such image"));
        assert!(ui.displayed().is_empty());
    }
}
