//! A wheel-of-names picker for the terminal.
//!
//! Run the binary to spin the wheel for one of your saved groups.
//! Use `--new-group` / `--import` to add groups, `--share` to print a link,
//! and `--pick` to spin without the interactive view.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    spin_runtime::{self, SpinHandle, SpinMessage},
    state::{ActiveView, AppState},
};
use crate::config::AppConfig;
use crate::core::{
    animator::TokioScheduler,
    group::{GroupCreateRequest, Person},
    selector::SystemRandom,
    share,
    store::{self, GroupStore},
    workflow::SelectionWorkflow,
};
use crate::ui::{
    dialog::ResultDialog, group_list::GroupList, layout::AppLayout, spinner::SpinIndicator,
    theme::Theme, wheel::WheelWidget,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Weighted wheel-of-names picker")]
struct Cli {
    /// Group to open or pick from (id or name; defaults to the first group).
    group: Option<String>,

    /// Group store file (defaults to `$XDG_DATA_HOME/dew-luck/groups.json`).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Seed the random source for reproducible spins.
    #[arg(long)]
    seed: Option<u64>,

    /// Full rotations before the wheel lands.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=10))]
    rounds: Option<u64>,

    /// Spin once without the interactive view and print the winner.
    #[arg(long)]
    pick: bool,

    /// With `--pick`: record the winner as selected.
    #[arg(long, requires = "pick")]
    mark: bool,

    /// Print the share link for GROUP and exit.
    #[arg(long, value_name = "GROUP")]
    share: Option<String>,

    /// Create a group from a share link, then open it.
    #[arg(long, value_name = "URL")]
    import: Option<String>,

    /// Create a group and exit.
    #[arg(long, value_name = "NAME")]
    new_group: Option<String>,

    /// Append `--person` entries to an existing group and exit.
    #[arg(long, value_name = "GROUP", conflicts_with = "new_group")]
    add_to: Option<String>,

    /// Member of `--new-group` or `--add-to`, as `NAME` or `NAME:WEIGHT`
    /// (repeatable).
    #[arg(long = "person", value_name = "NAME[:WEIGHT]")]
    people: Vec<String>,

    /// With `--new-group`: people already picked sit out later spins.
    #[arg(long, requires = "new_group")]
    respect_early_selection: bool,

    /// List stored groups and exit.
    #[arg(long)]
    list: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

// ───────────────────────────────────────── headless ─────────

fn parse_people(specs: &[String]) -> Result<Vec<Person>> {
    specs
        .iter()
        .map(|spec| {
            Person::parse_spec(spec)
                .with_context(|| format!("invalid person `{spec}` (expected NAME or NAME:WEIGHT)"))
        })
        .collect()
}

fn create_group_from_cli(store: &mut GroupStore, cli: &Cli, name: &str) -> Result<()> {
    let id = store.create_group(GroupCreateRequest {
        id: None,
        name: name.to_string(),
        respect_early_selection: cli.respect_early_selection,
        people: parse_people(&cli.people)?,
    })?;
    println!("{id}");
    Ok(())
}

fn add_people_from_cli(store: &mut GroupStore, key: &str, specs: &[String]) -> Result<()> {
    if specs.is_empty() {
        bail!("`--add-to` needs at least one `--person`");
    }
    let mut group = store.find(key)?.context("no such group")?;
    for person in parse_people(specs)? {
        if group.people.iter().any(|p| p.name == person.name) {
            eprintln!("{} is already in {}", person.name, group.name);
            continue;
        }
        group.people.push(person);
    }
    let id = group.id.clone();
    store.update_group(&id, group)?;
    Ok(())
}

fn import_shared(store: &mut GroupStore, url: &str) -> Result<String> {
    let Some(req) = share::decode_group_url(url).context("could not read shared group")? else {
        bail!("link has no `{}` parameter", share::SHARE_PARAM);
    };
    if let Some(id) = req.id.as_deref() {
        if store.find(id)?.is_some_and(|g| g.id == id) {
            tracing::info!(id, "shared group already present");
            return Ok(id.to_string());
        }
    }
    let name = req.name.clone();
    let id = store.create_group(req)?;
    tracing::info!(%id, source = %share::strip_shared_param(url)?, "imported shared group");
    eprintln!("Imported {name}");
    Ok(id)
}

fn list_groups(store: &mut GroupStore) -> Result<()> {
    for g in store.fetch_groups()? {
        println!(
            "{}\t{}\t{}/{} picked",
            g.id,
            g.name,
            g.selected_count(),
            g.people.len()
        );
    }
    Ok(())
}

/// Run one complete spin on the real timer and print the winner.
async fn headless_pick(
    store: &mut GroupStore,
    key: Option<&str>,
    config: &AppConfig,
    random: &mut SystemRandom,
    mark: bool,
) -> Result<()> {
    let group = match key {
        Some(k) => store.find(k)?,
        None => store.fetch_groups()?.first().cloned(),
    }
    .context("no such group")?;

    let candidates = group.candidates();
    let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    let mut workflow = SelectionWorkflow::new(candidates, config.timing);

    let winner = workflow
        .spin(random, &TokioScheduler, |idx| {
            tracing::debug!(highlight = idx, name = %names[idx], "step");
        })
        .await
        .with_context(|| format!("cannot spin {}", group.name))?;

    println!("{}", winner.name);
    if mark {
        store.select_person(&group.id, &winner.name)?;
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(rounds) = cli.rounds {
        config.timing.rounds = rounds as usize;
    }
    let mut random = match cli.seed {
        Some(seed) => SystemRandom::seeded(seed),
        None => SystemRandom::from_entropy(),
    };
    let mut store = GroupStore::open(cli.store.clone().unwrap_or_else(store::default_store_path));

    // ── one-shot modes ────────────────────────────────────────
    if cli.write_config {
        config.save()?;
        return Ok(());
    }
    if let Some(name) = cli.new_group.as_deref() {
        return create_group_from_cli(&mut store, &cli, name);
    }
    if let Some(key) = cli.add_to.as_deref() {
        return add_people_from_cli(&mut store, key, &cli.people);
    }
    if !cli.people.is_empty() {
        bail!("`--person` needs `--new-group` or `--add-to`");
    }
    if cli.list {
        return list_groups(&mut store);
    }
    if let Some(key) = cli.share.as_deref() {
        let group = store.find(key)?.context("no such group")?;
        println!(
            "{}",
            share::encode_group_url(&config.share_base_url, &group.to_request())?
        );
        return Ok(());
    }

    let mut open_group = cli.group.clone();
    if let Some(url) = cli.import.as_deref() {
        open_group = Some(import_shared(&mut store, url)?);
    }

    if cli.pick {
        return headless_pick(
            &mut store,
            open_group.as_deref(),
            &config,
            &mut random,
            cli.mark,
        )
        .await;
    }

    // ── interactive wheel ─────────────────────────────────────
    let mut state = AppState::new(store, config, random)?;
    if let Some(key) = open_group.as_deref() {
        match state.store.find(key)? {
            Some(g) => state.select_group_id(&g.id),
            None => state.status_message = Some(format!("No group named {key}")),
        }
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (spin_tx, mut spin_rx) = tokio::sync::mpsc::unbounded_channel::<SpinMessage>();
    let mut active_spin: Option<SpinHandle> = None;

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let groups_block = Block::default()
                .title(" Groups ")
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            frame.render_widget(
                GroupList::new(&state.groups, state.group_selected).block(groups_block),
                layout.groups_area,
            );

            let title = state
                .selected_group()
                .map(|g| format!(" {} ", g.name))
                .unwrap_or_else(|| " Wheel ".to_string());
            let wheel_block = Block::default()
                .title(title)
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            frame.render_widget(
                WheelWidget::new(&state.workflow).block(wheel_block),
                layout.wheel_area,
            );
            frame.render_widget(
                SpinIndicator {
                    tick: state.tick,
                    passing: state
                        .workflow
                        .is_spinning()
                        .then(|| state.workflow.highlighted())
                        .flatten()
                        .and_then(|idx| state.workflow.candidates().get(idx))
                        .map(|c| c.name.as_str()),
                },
                layout.wheel_area,
            );

            let hint = state.config.status_bar_hint();
            let status_text = state.status_message.as_deref().unwrap_or(&hint);
            frame.render_widget(
                Paragraph::new(status_text).style(Theme::status_bar_style()),
                layout.status_area,
            );

            if state.active_view == ActiveView::ResultDialog {
                if let (Some(winner), Some(group)) =
                    (state.workflow.outcome(), state.selected_group())
                {
                    frame.render_widget(
                        ResultDialog {
                            winner: &winner.name,
                            group_name: &group.name,
                            config: &state.config,
                        },
                        frame.area(),
                    );
                }
            }
        })?;

        // ── start a queued spin AFTER draw ───────────────────────
        if let Some(ticket) = state.pending_spin.take() {
            if let Some(old) = active_spin.take() {
                old.cancel();
            }
            active_spin = Some(spin_runtime::start_spin(&mut state, ticket, &spin_tx));
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Resize => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some((generation, update)) = spin_rx.recv() => {
                // Drain everything already queued so one redraw covers a
                // burst of steps.
                let mut landed = spin_runtime::apply_spin_update(&mut state, generation, update);
                while let Ok((g, u)) = spin_rx.try_recv() {
                    landed |= spin_runtime::apply_spin_update(&mut state, g, u);
                }
                if landed {
                    active_spin = None;
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    if let Some(spin) = active_spin {
        spin.cancel();
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> GroupStore {
        GroupStore::open(dir.path().join("groups.json"))
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dew-luck").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn reimporting_a_link_opens_the_stored_group() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut s = store(&dir);
        let id = s.create_group(GroupCreateRequest {
            id: Some("shared-1".into()),
            name: "standup".into(),
            respect_early_selection: false,
            people: vec![Person::new("ana", 1.0)],
        })?;
        let group = s.find(&id)?.context("stored group")?;
        let link = share::encode_group_url("https://example.org/?tab=2", &group.to_request())?;

        assert_eq!(import_shared(&mut s, &link)?, "shared-1");
        assert_eq!(s.fetch_groups()?.len(), 1);
        Ok(())
    }

    #[test]
    fn importing_a_new_link_creates_the_group() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut s = store(&dir);
        let req = GroupCreateRequest {
            id: None,
            name: "retro".into(),
            respect_early_selection: true,
            people: vec![Person::new("bo", 2.0)],
        };
        let link = share::encode_group_url("https://example.org/", &req)?;

        let id = import_shared(&mut s, &link)?;
        let group = s.find(&id)?.context("imported group")?;
        assert_eq!(group.name, "retro");
        assert!(group.respect_early_selection);

        assert!(import_shared(&mut s, "https://example.org/").is_err());
        Ok(())
    }

    #[test]
    fn add_to_skips_names_already_present() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut s = store(&dir);
        let args = cli(&["--new-group", "standup", "--person", "ana", "--person", "bo:2"]);
        create_group_from_cli(&mut s, &args, "standup")?;

        let specs = vec!["bo:9".to_string(), "cy:3".to_string()];
        add_people_from_cli(&mut s, "standup", &specs)?;

        let group = s.find("standup")?.context("group")?;
        let people: Vec<(&str, f64)> = group
            .people
            .iter()
            .map(|p| (p.name.as_str(), p.weight))
            .collect();
        assert_eq!(people, vec![("ana", 1.0), ("bo", 2.0), ("cy", 3.0)]);

        assert!(add_people_from_cli(&mut s, "standup", &[]).is_err());
        assert!(add_people_from_cli(&mut s, "nobody", &specs).is_err());
        Ok(())
    }

    #[test]
    fn non_finite_weights_never_reach_the_store() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut s = store(&dir);
        let args = cli(&["--new-group", "g", "--person", "ana:inf"]);
        assert!(create_group_from_cli(&mut s, &args, "g").is_err());

        let args = cli(&["--new-group", "g", "--person", "ana:2.5"]);
        create_group_from_cli(&mut s, &args, "g")?;
        let specs = vec!["bo:NaN".to_string()];
        assert!(add_people_from_cli(&mut s, "g", &specs).is_err());

        // Still readable after a fresh load.
        s.invalidate();
        let groups = s.fetch_groups()?;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].people, vec![Person::new("ana", 2.5)]);
        Ok(())
    }
}
