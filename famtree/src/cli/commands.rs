use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, DrawStyle, Settings};
use crate::domain::sample::qempa_family;
use crate::domain::{BirthYear, FamilyTree, PersonId, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Some(Commands::Draw { names_only, style }) => _draw(cli.from, &settings, *names_only, *style),
        Some(Commands::Validate { whole_tree }) => _validate(cli.from, *whole_tree),
        Some(Commands::Ancestors { pid }) => _ancestors(*pid),
        Some(Commands::Childless) => _childless(cli.from),
        Some(Commands::Gaps { younger, older }) => _gaps(cli.from, &settings, *younger, *older),
        Some(Commands::Succession { alive }) => _succession(cli.from, alive.as_deref()),
        Some(Commands::Prune { alive, names_only }) => {
            _prune(cli.from, &settings, alive, *names_only)
        }
        Some(Commands::Info) => _info(),
        Some(Commands::Config { command }) => _config(command, &settings),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

/// Person at `from`, or the root.
fn start_of(tree: &FamilyTree, from: Option<PersonId>) -> CliResult<Index> {
    match from {
        Some(pid) => tree.find(pid).ok_or(CliError::UnknownPerson(pid)),
        None => Ok(tree.root()),
    }
}

fn label_of(tree: &FamilyTree, pid: PersonId) -> String {
    tree.find(pid)
        .and_then(|idx| tree.person(idx))
        .map(|p| p.label())
        .unwrap_or_else(|| pid.to_string())
}

fn render(tree: &FamilyTree, start: Index, names_only: bool, style: DrawStyle) -> CliResult<()> {
    match style {
        DrawStyle::Classic => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            tree.draw(start, names_only, &mut out)
                .and_then(|_| out.flush())
                .map_err(|e| CliError::io("write tree to stdout", e))
        }
        DrawStyle::Termtree => {
            print!("{}", tree.to_tree_string(start, names_only));
            Ok(())
        }
    }
}

fn print_ids(tree: &FamilyTree, ids: &BTreeSet<PersonId>) {
    if ids.is_empty() {
        output::detail("(none)");
    }
    for &pid in ids {
        output::detail(&label_of(tree, pid));
    }
}

#[instrument(skip(settings))]
fn _draw(
    from: Option<PersonId>,
    settings: &Settings,
    names_only: bool,
    style: Option<DrawStyle>,
) -> CliResult<()> {
    let tree = qempa_family()?;
    let start = start_of(&tree, from)?;
    let style = style.unwrap_or(settings.render.style);
    render(&tree, start, names_only || settings.render.names_only, style)
}

#[instrument]
fn _validate(from: Option<PersonId>, whole_tree: bool) -> CliResult<()> {
    let tree = qempa_family()?;
    let start = start_of(&tree, from)?;
    let target = if whole_tree { tree.top_of(start) } else { start };

    tree.validate(target)?;
    output::success("family tree is valid");
    Ok(())
}

#[instrument]
fn _ancestors(pid: PersonId) -> CliResult<()> {
    let tree = qempa_family()?;
    let idx = tree.find(pid).ok_or(CliError::UnknownPerson(pid))?;

    output::header(&format!("Ancestors of {}", label_of(&tree, pid)));
    let line = tree
        .ancestors(idx)
        .into_iter()
        .filter_map(|a| tree.person(a))
        .map(|p| p.label())
        .join(" -> ");
    if line.is_empty() {
        output::detail("(none)");
    } else {
        output::detail(&line);
    }
    Ok(())
}

#[instrument]
fn _childless(from: Option<PersonId>) -> CliResult<()> {
    let tree = qempa_family()?;
    let start = start_of(&tree, from)?;

    output::header("Without children");
    print_ids(&tree, &tree.childless(start));
    Ok(())
}

#[instrument(skip(settings))]
fn _gaps(
    from: Option<PersonId>,
    settings: &Settings,
    younger: Option<BirthYear>,
    older: Option<BirthYear>,
) -> CliResult<()> {
    let tree = qempa_family()?;
    let start = start_of(&tree, from)?;
    let younger = younger.unwrap_or(settings.age_gap.younger_than);
    let older = older.unwrap_or(settings.age_gap.older_than);

    output::header(&format!("Parents of a child born less than {} years later", younger));
    print_ids(&tree, &tree.parents_younger_than(start, younger));
    output::header(&format!("Parents of a child born more than {} years later", older));
    print_ids(&tree, &tree.parents_older_than(start, older));
    Ok(())
}

#[instrument]
fn _succession(from: Option<PersonId>, alive: Option<&[PersonId]>) -> CliResult<()> {
    let tree = qempa_family()?;
    let start = start_of(&tree, from)?;
    let alive: HashSet<PersonId> = match alive {
        Some(ids) => ids.iter().copied().collect(),
        None => tree.iter().map(|(_, node)| node.data.pid).collect(),
    };

    output::header("Line of succession");
    let ranks = tree.order_of_succession(start, &alive);
    if ranks.is_empty() {
        output::detail("(none)");
    }
    for (pid, rank) in ranks.into_iter().sorted_by_key(|&(_, rank)| rank) {
        output::detail(&format!("{:>3}. {}", rank, label_of(&tree, pid)));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _prune(
    from: Option<PersonId>,
    settings: &Settings,
    alive: &[PersonId],
    names_only: bool,
) -> CliResult<()> {
    let mut tree = qempa_family()?;
    let start = start_of(&tree, from)?;
    let alive: HashSet<PersonId> = alive.iter().copied().collect();

    let labels: HashMap<PersonId, String> = tree
        .iter()
        .map(|(_, node)| (node.data.pid, node.data.label()))
        .collect();
    let removed = tree.remove_extinct_branches(start, &alive);
    info!(count = removed.len(), "pruned extinct branches");

    output::header(&format!("Removed {} persons", removed.len()));
    for pid in &removed {
        if let Some(label) = labels.get(pid) {
            output::removed(label);
        }
    }
    output::info("");
    render(
        &tree,
        tree.root(),
        names_only || settings.render.names_only,
        settings.render.style,
    )
}

#[instrument]
fn _info() -> CliResult<()> {
    let tree = qempa_family()?;
    let root = tree
        .person(tree.root())
        .map(|p| p.label())
        .unwrap_or_default();

    output::info(&format!("root:        {}", root));
    output::info(&format!("persons:     {}", tree.len()));
    output::info(&format!("generations: {}", tree.generations()));
    output::info(&format!("valid:       {}", tree.is_valid(tree.root())));
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::info("(no config directory available)"),
        },
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
