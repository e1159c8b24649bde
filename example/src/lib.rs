//! Replays a scripted code-entry session against an in-memory host.
//!
//! Each character of `--keys` is one key press on the focused field:
//!
//! - `<` erases the focused field
//! - `.` ends editing (return key)
//! - `|` taps outside, dropping focus
//! - anything else is typed

use std::{sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use codefield::{
    ContentType, Field, FieldSequenceConfig, FieldSequenceController, FixedHeight,
    FrameScheduler, HostServices, KeyboardHeight, UiTree, VirtualKeyboard,
    testing::{TestField, TestHost, as_fields},
};
use codefield_platform::platform_keyboard_height;
use tracing::{debug, info, warn};

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Content {
    Pin,
    Number,
    Decimal,
    Email,
    Text,
    Password,
}

impl From<Content> for ContentType {
    fn from(content: Content) -> Self {
        match content {
            Content::Pin => ContentType::Pin,
            Content::Number => ContentType::IntegerNumber,
            Content::Decimal => ContentType::DecimalNumber,
            Content::Email => ContentType::EmailAddress,
            Content::Text => ContentType::Standard,
            Content::Password => ContentType::Password,
        }
    }
}

/// Command line options of the demo.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Number of fields in the sequence.
    #[arg(long, default_value_t = 6)]
    cells: usize,
    /// Characters each field accepts, 0 for unlimited.
    #[arg(long, default_value_t = 1)]
    limit: usize,
    /// Expected input of every field.
    #[arg(long, value_enum, default_value_t = Content::Pin)]
    content: Content,
    /// Key presses to replay.
    #[arg(long, default_value = "123<3456")]
    keys: String,
    /// Fixed keyboard height; the platform query is used when omitted.
    #[arg(long)]
    keyboard_height: Option<f32>,
    /// Screen position of the fields.
    #[arg(long, default_value_t = 120.0)]
    field_y: f32,
    /// Do not focus the first field on start.
    #[arg(long)]
    no_auto_activate: bool,
    /// Do not advance multi-character fields when editing ends.
    #[arg(long)]
    no_auto_advance: bool,
    /// Keep the input line the keyboard draws above itself.
    #[arg(long)]
    show_input: bool,
    /// Panel-follow loop period in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

impl Args {
    fn config(&self) -> FieldSequenceConfig {
        FieldSequenceConfig::default()
            .auto_activate_first(!self.no_auto_activate)
            .auto_advance(!self.no_auto_advance)
            .hide_input(!self.show_input)
            .poll_interval(Duration::from_millis(self.poll_ms))
    }

    fn keyboard_height(&self) -> Arc<dyn KeyboardHeight> {
        match self.keyboard_height {
            Some(height) => Arc::new(FixedHeight(height)),
            None => platform_keyboard_height(),
        }
    }
}

struct Session {
    host: TestHost,
    fields: Vec<Arc<TestField>>,
    controller: FieldSequenceController,
    scheduler: FrameScheduler,
}

impl Session {
    fn new(args: &Args) -> anyhow::Result<Self> {
        let host = TestHost::new();
        let fields: Vec<_> = (0..args.cells)
            .map(|_| host.field(args.limit, args.content.into()))
            .collect();
        for field in &fields {
            field.set_screen_y(args.field_y);
        }

        let services = HostServices {
            keyboard_height: args.keyboard_height(),
            ..host.services()
        };
        let controller =
            FieldSequenceController::new(host.node, as_fields(&fields), services, args.config())?;
        let scheduler = FrameScheduler::new();
        controller.enable(&scheduler);
        controller.initialize()?;

        Ok(Self {
            host,
            fields,
            controller,
            scheduler,
        })
    }

    fn focused(&self) -> Option<&Arc<TestField>> {
        self.fields.iter().find(|field| field.is_focused())
    }

    fn press(&self, key: char) {
        let field = match self.focused() {
            Some(field) => field,
            None => match self.controller.activate_first_empty_field() {
                Some(index) => &self.fields[index],
                None => {
                    warn!(%key, "no field left to type into");
                    return;
                }
            },
        };

        match key {
            '<' => field.clear(),
            '.' => field.end_edit(),
            '|' => field.blur(),
            key => {
                let mut text = if field.is_single_character() {
                    String::new()
                } else {
                    field.text()
                };
                let limit = field.character_limit();
                if limit == 0 || text.chars().count() < limit {
                    text.push(key);
                }
                field.type_text(&text);
            }
        }
        debug!(%key, code = %self.controller.concatenated_text(), "key pressed");
    }

    fn wait(&self, duration: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            self.scheduler.advance(FRAME);
            elapsed += FRAME;
        }
    }

    fn report(&self) {
        info!(
            focused = ?self.controller.focused_index(),
            keyboard = self.host.keyboard.is_visible(),
            panel = ?self.host.tree.position(self.host.panel),
            "session state"
        );
    }
}

/// Parses the command line and replays the session it describes.
pub fn desktop_main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    run(&args)
}

/// Replays the session described by `args` and prints the entered code.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let session = Session::new(args)?;
    let poll = Duration::from_millis(args.poll_ms);

    session.wait(poll);
    session.report();
    for key in args.keys.chars() {
        session.press(key);
        session.wait(poll);
        session.report();
    }

    session.controller.disable();
    session.report();
    println!("{}", session.controller.concatenated_text());
    Ok(())
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,codefield=info,example=info")
        {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["example"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn default_script_fills_six_digits() {
        let args = args(&["--keyboard-height", "300"]);
        let session = Session::new(&args).unwrap();
        for key in args.keys.chars() {
            session.press(key);
        }
        assert_eq!(session.controller.concatenated_text(), "123456");
    }

    #[test]
    fn panel_follows_fixed_keyboard_height() {
        let args = args(&["--keyboard-height", "300", "--field-y", "100"]);
        let session = Session::new(&args).unwrap();
        session.wait(Duration::from_millis(args.poll_ms));

        let raised = session.host.tree.position(session.host.panel);
        assert_eq!(raised.y, 200.0);

        session.controller.disable();
        assert_eq!(session.host.tree.position(session.host.panel).y, 0.0);
    }

    #[test]
    fn input_line_is_hidden_unless_asked_for() {
        let session = Session::new(&args(&["--keyboard-height", "300"])).unwrap();
        assert!(session.host.keyboard.hides_input());

        let args = args(&["--keyboard-height", "300", "--show-input"]);
        assert!(!args.config().hide_input);
        let session = Session::new(&args).unwrap();
        assert!(!session.host.keyboard.hides_input());
    }

    #[test]
    fn email_fields_advance_on_return() {
        let args = args(&[
            "--cells", "2", "--limit", "0", "--content", "email", "--keys", "ab.cd",
        ]);
        let session = Session::new(&args).unwrap();
        for key in args.keys.chars() {
            session.press(key);
        }
        assert_eq!(session.controller.concatenated_text(), "abcd");
        assert_eq!(session.controller.focused_index(), Some(1));
    }
}
