use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::session_io::{self, SessionError};
use crate::model::config::SuggestConfig;
use crate::model::payload::DeltaPayload;
use crate::model::session::Session;
use crate::model::tag::TagLabel;
use crate::ops::delta_ops::apply_delta;
use crate::ops::tracker::{NoticeKind, Notifier, TagSelectionTracker, TagView};
use crate::parse::{parse_tag_args, parse_tag_string};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// A failure that has already been shown to the user through the notifier.
/// `main` exits non-zero without printing it again.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

/// Per-invocation settings resolved from global flags
struct Context {
    dir: PathBuf,
    json: bool,
    quiet: bool,
    config_path: Option<PathBuf>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Result<Context, Box<dyn std::error::Error>> {
        let dir = match cli.dir {
            Some(ref dir) => std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
            None => std::env::current_dir()?,
        };
        Ok(Context {
            dir,
            json: cli.json,
            quiet: cli.quiet,
            config_path: cli.config.as_ref().map(PathBuf::from),
        })
    }

    fn config(&self) -> Result<SuggestConfig, config_io::ConfigError> {
        match self.config_path {
            Some(ref path) => config_io::read_config(path),
            None => config_io::load_config(&self.dir),
        }
    }

    fn notifier(&self) -> StderrNotifier {
        StderrNotifier { quiet: self.quiet }
    }

    fn view(&self) -> StdoutView {
        StdoutView { json: self.json }
    }

    /// Build a tracker over the session's state, fields and rules
    fn tracker(&self, session: &Session) -> Result<TagSelectionTracker, Box<dyn std::error::Error>> {
        self.tracker_with(session, self.view(), self.notifier())
    }

    /// Build a tracker whose output is queued until the session is saved
    fn deferred_tracker(
        &self,
        session: &Session,
    ) -> Result<(TagSelectionTracker, Deferred), Box<dyn std::error::Error>> {
        let pending = Deferred::default();
        let tracker = self.tracker_with(session, pending.clone(), pending.clone())?;
        Ok((tracker, pending))
    }

    fn tracker_with(
        &self,
        session: &Session,
        view: impl TagView + 'static,
        notifier: impl Notifier + 'static,
    ) -> Result<TagSelectionTracker, Box<dyn std::error::Error>> {
        let state = session.state().map_err(SessionError::from)?;
        let tracker = TagSelectionTracker::from_state(state, view, notifier, session.fields.clone())
            .with_config(self.config()?);
        Ok(tracker)
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = Context::from_cli(&cli)?;
    log::debug!("session directory: {}", ctx.dir.display());

    match cli.command {
        Commands::Open(args) => cmd_open(&ctx, args),
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Rm(args) => cmd_rm(&ctx, args),
        Commands::Show => cmd_show(&ctx),
        Commands::Field(args) => cmd_field(&ctx, args),
        Commands::Suggest(args) => cmd_suggest(&ctx, args),
        Commands::Payload => cmd_payload(&ctx),
        Commands::Submit => cmd_submit(&ctx),
        Commands::Close => cmd_close(&ctx),
        Commands::Apply(args) => cmd_apply(&ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_open(ctx: &Context, args: OpenArgs) -> CmdResult {
    if session_io::session_exists(&ctx.dir) && !args.force {
        return Err(SessionError::AlreadyOpen(ctx.dir.clone()).into());
    }

    let mut tags = parse_tag_args(&args.tags);
    if let Some(ref s) = args.tag_string {
        for label in parse_tag_string(s) {
            if !tags.contains(&label) {
                tags.push(label);
            }
        }
    }

    let session = Session::open(tags);
    // Load the rules before writing so a bad config leaves nothing behind
    let mut tracker = ctx.tracker(&session)?;
    session_io::write_session(&ctx.dir, &session)?;
    log::info!(
        "opened session in {} with {} persisted tags",
        ctx.dir.display(),
        session.original.len()
    );
    tracker.refresh();
    ctx.notifier().notify(
        &format!("Opened session with {} tags", session.original.len()),
        NoticeKind::Info,
    );
    Ok(())
}

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let mut session = session_io::read_session(&ctx.dir)?;
    let (mut tracker, pending) = ctx.deferred_tracker(&session)?;
    let result = tracker.add_tag(&args.tag);
    if result.is_ok() {
        session.update(tracker.state());
        session_io::write_session(&ctx.dir, &session)?;
    }
    pending.flush(&mut ctx.view(), &mut ctx.notifier());
    result.map_err(|e| Reported(e.to_string()))?;
    Ok(())
}

fn cmd_rm(ctx: &Context, args: RmArgs) -> CmdResult {
    let label = TagLabel::try_from(args.tag.as_str())?;
    let mut session = session_io::read_session(&ctx.dir)?;
    let (mut tracker, pending) = ctx.deferred_tracker(&session)?;
    let result = tracker.remove_tag(&label);
    if result.is_ok() {
        session.update(tracker.state());
        session_io::write_session(&ctx.dir, &session)?;
    }
    pending.flush(&mut ctx.view(), &mut ctx.notifier());
    result.map_err(|e| Reported(e.to_string()))?;
    Ok(())
}

fn cmd_show(ctx: &Context) -> CmdResult {
    let session = session_io::read_session(&ctx.dir)?;
    let state = session.state().map_err(SessionError::from)?;
    if ctx.json {
        let out = show_to_json(&state, session.created);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_show(&state));
    }
    Ok(())
}

fn cmd_field(ctx: &Context, args: FieldArgs) -> CmdResult {
    let mut session = session_io::read_session(&ctx.dir)?;
    let key = args.key.trim().to_string();
    if key.is_empty() {
        return Err("field name must not be empty".into());
    }
    match args.value {
        Some(value) => {
            session.fields.insert(key, value);
        }
        None => {
            session.fields.remove(&key);
        }
    }
    // Load the rules first so a bad config leaves the session as it was
    let mut tracker = ctx.tracker(&session)?;
    session_io::write_session(&ctx.dir, &session)?;

    // Field changes alter suggestions, so repaint
    tracker.refresh();
    Ok(())
}

fn cmd_suggest(ctx: &Context, args: SuggestArgs) -> CmdResult {
    let session = session_io::read_session(&ctx.dir)?;
    let tracker = ctx.tracker(&session)?;
    let mut fields = session.fields.clone();
    fields.extend(args.fields);
    let suggestions = tracker.suggest_tags(&fields);
    if ctx.json {
        println!("{}", serde_json::to_string(&suggestions)?);
    } else {
        for label in &suggestions {
            println!("{}", label);
        }
    }
    Ok(())
}

fn cmd_payload(ctx: &Context) -> CmdResult {
    let session = session_io::read_session(&ctx.dir)?;
    let tracker = ctx.tracker(&session)?;
    println!("{}", tracker.serialize_delta());
    Ok(())
}

fn cmd_submit(ctx: &Context) -> CmdResult {
    let session = session_io::read_session(&ctx.dir)?;
    let tracker = ctx.tracker(&session)?;
    let payload = tracker.serialize_delta();
    let state = tracker.into_state();
    let delta = state.delta();

    let tags = apply_delta(&session.original, &delta);
    let mut next = Session::open(tags.clone());
    next.fields = session.fields;
    session_io::write_session(&ctx.dir, &next)?;

    if ctx.json {
        let out = SubmitJson {
            payload,
            tags: tags.clone(),
        };
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("{}", payload);
    }

    let mut notifier = ctx.notifier();
    if delta.is_empty() {
        notifier.notify("Nothing to submit", NoticeKind::Info);
    } else {
        notifier.notify(
            &format!(
                "Submitted +{} -{}, record now has {}",
                delta.added.len(),
                delta.removed.len(),
                format_tags(&tags)
            ),
            NoticeKind::Success,
        );
    }
    Ok(())
}

fn cmd_close(ctx: &Context) -> CmdResult {
    let session = session_io::read_session(&ctx.dir)?;
    let state = session.state().map_err(SessionError::from)?;
    session_io::remove_session(&ctx.dir)?;
    let mut notifier = ctx.notifier();
    if state.is_dirty() {
        notifier.notify(
            &format!(
                "Discarded unsubmitted changes (+{} -{})",
                state.added().len(),
                state.removed().len()
            ),
            NoticeKind::Warning,
        );
    } else {
        notifier.notify("Session closed", NoticeKind::Info);
    }
    Ok(())
}

fn cmd_apply(ctx: &Context, args: ApplyArgs) -> CmdResult {
    let persisted = parse_tag_string(&args.persisted);
    let payload = DeltaPayload::decode(&args.payload)?;
    let tags = apply_delta(&persisted, &payload.delta);
    if ctx.json {
        println!("{}", serde_json::to_string(&tags)?);
    } else {
        println!("{}", format_tags(&tags));
    }
    Ok(())
}
