use arbor_state::TreeStore;
use arbor_tree::{NodeId, flatten_ids};
use arbor_view::ForestView;
use displaydoc::Display;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    task::JoinSet,
};
use tracing::{debug, warn};

pub const HELP: &str = "\
commands:
  toggle <id>               expand or collapse, fetching children if unknown
  load <id>                 fetch children without toggling
  add <parent> <name>       add a child
  root [name]               add a root node
  rm <id>                   delete a subtree
  rename <id> <name>        rename and leave edit mode
  edit <id>                 enter edit mode
  cancel <id>               leave edit mode without renaming
  mv <id> <parent|-> <i>    move a subtree, `-` for the top level
  drag <id>                 start dragging
  drop <id>                 drop the dragged node after <id>
  undrag                    stop dragging
  show                      print the tree
  ids                       list every id
  help                      print this help
  quit                      leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Toggle(NodeId),
    Load(NodeId),
    Add { parent: NodeId, name: String },
    Root(Option<String>),
    Remove(NodeId),
    Rename { id: NodeId, name: String },
    Edit(NodeId),
    Cancel(NodeId),
    Move {
        id: NodeId,
        parent: Option<NodeId>,
        index: usize,
    },
    Drag(NodeId),
    Drop(NodeId),
    Undrag,
    Show,
    Ids,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Display)]
pub enum CommandParseError {
    /// Empty command
    Empty,
    /// Unknown command: {0} (try `help`)
    Unknown(String),
    /// Missing <{argument}> for `{command}`
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    /// Invalid index: {0}
    InvalidIndex(String),
}

fn next_id(
    words: &mut SplitWhitespace<'_>,
    command: &'static str,
) -> Result<NodeId, CommandParseError> {
    words
        .next()
        .map(NodeId::from)
        .ok_or(CommandParseError::MissingArgument {
            command,
            argument: "id",
        })
}

fn rest(words: SplitWhitespace<'_>) -> String {
    words.collect::<Vec<_>>().join(" ")
}

impl FromStr for ShellCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(CommandParseError::Empty)?;

        let parsed = match command {
            "toggle" | "t" => ShellCommand::Toggle(next_id(&mut words, "toggle")?),
            "load" => ShellCommand::Load(next_id(&mut words, "load")?),
            "add" => {
                let parent = next_id(&mut words, "add")?;
                let name = rest(words);
                if name.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "add",
                        argument: "name",
                    });
                }
                ShellCommand::Add { parent, name }
            }
            "root" => {
                let name = rest(words);
                ShellCommand::Root((!name.is_empty()).then_some(name))
            }
            "rm" | "delete" => ShellCommand::Remove(next_id(&mut words, "rm")?),
            "rename" => {
                let id = next_id(&mut words, "rename")?;
                ShellCommand::Rename {
                    id,
                    name: rest(words),
                }
            }
            "edit" => ShellCommand::Edit(next_id(&mut words, "edit")?),
            "cancel" => ShellCommand::Cancel(next_id(&mut words, "cancel")?),
            "mv" | "move" => {
                let id = next_id(&mut words, "mv")?;
                let parent = match words.next() {
                    Some("-") => None,
                    Some(parent) => Some(NodeId::from(parent)),
                    None => {
                        return Err(CommandParseError::MissingArgument {
                            command: "mv",
                            argument: "parent",
                        });
                    }
                };
                let index = words.next().ok_or(CommandParseError::MissingArgument {
                    command: "mv",
                    argument: "index",
                })?;
                let index = index
                    .parse()
                    .map_err(|_| CommandParseError::InvalidIndex(index.to_string()))?;
                ShellCommand::Move { id, parent, index }
            }
            "drag" => ShellCommand::Drag(next_id(&mut words, "drag")?),
            "drop" => ShellCommand::Drop(next_id(&mut words, "drop")?),
            "undrag" => ShellCommand::Undrag,
            "show" | "ls" => ShellCommand::Show,
            "ids" => ShellCommand::Ids,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(parsed)
    }
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
}

/// Read commands line by line from `input` until it ends or `quit`.
///
/// Fetches run as background tasks so the shell keeps taking commands while
/// children load. Every published snapshot is rendered to `output`.
pub async fn run_shell<R, W>(
    store: TreeStore,
    input: R,
    mut output: W,
) -> Result<(), ShellError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut updates = store.subscribe();
    let mut fetches: JoinSet<String> = JoinSet::new();

    let initial = updates.borrow_and_update().clone();
    write(&mut output, &ForestView(&initial).to_string()).await?;

    loop {
        tokio::select! {
            biased;

            Some(joined) = fetches.join_next() => {
                let message = joined.unwrap_or_else(|error| format!("fetch task failed: {error}"));
                write(&mut output, &message).await?;
            }

            Ok(()) = updates.changed() => {
                let forest = updates.borrow_and_update().clone();
                write(&mut output, &ForestView(&forest).to_string()).await?;
            }

            line = lines.next_line() => {
                let Some(line) = line.map_err(ShellError::Read)? else {
                    debug!("input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ShellCommand>() {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => {
                        let reply = execute(&store, command, &mut fetches);
                        write(&mut output, &reply).await?;
                    }
                    Err(error) => {
                        warn!(%error, "bad command");
                        write(&mut output, &error.to_string()).await?;
                    }
                }
            }
        }
    }

    while let Some(joined) = fetches.join_next().await {
        let message = joined.unwrap_or_else(|error| format!("fetch task failed: {error}"));
        write(&mut output, &message).await?;
    }
    if updates.has_changed().unwrap_or(false) {
        let forest = updates.borrow_and_update().clone();
        write(&mut output, &ForestView(&forest).to_string()).await?;
    }
    output.flush().await.map_err(ShellError::Write)
}

fn execute(store: &TreeStore, command: ShellCommand, fetches: &mut JoinSet<String>) -> String {
    match command {
        ShellCommand::Toggle(id) => {
            let store = store.clone();
            let reply = format!("toggling {id}");
            fetches.spawn(async move {
                let outcome = store.toggle(&id).await;
                format!("toggle {id}: {outcome:?}")
            });
            reply
        }
        ShellCommand::Load(id) => {
            let store = store.clone();
            let reply = format!("loading {id}");
            fetches.spawn(async move {
                let outcome = store.load_children(&id).await;
                format!("load {id}: {outcome:?}")
            });
            reply
        }
        ShellCommand::Add { parent, name } => match store.add(&parent, &name) {
            Some(id) => format!("added {id}"),
            None => format!("nothing added under {parent}"),
        },
        ShellCommand::Root(name) => {
            let id = store.add_root(name.as_deref().unwrap_or_default());
            format!("added root {id}")
        }
        ShellCommand::Remove(id) => changed(store.delete(&id), "deleted", &id),
        ShellCommand::Rename { id, name } => changed(store.rename(&id, &name), "renamed", &id),
        ShellCommand::Edit(id) => changed(store.set_editing(&id, true), "editing", &id),
        ShellCommand::Cancel(id) => changed(store.cancel_edit(&id), "stopped editing", &id),
        ShellCommand::Move { id, parent, index } => {
            changed(store.move_node(&id, parent.as_ref(), index), "moved", &id)
        }
        ShellCommand::Drag(id) => match store.start_drag(&id) {
            Some(item) => format!("dragging {} from depth {}", item.id, item.depth),
            None => format!("no node {id}"),
        },
        ShellCommand::Drop(target) => changed(store.drop_on(&target), "dropped after", &target),
        ShellCommand::Undrag => {
            store.end_drag();
            "drag cancelled".to_string()
        }
        ShellCommand::Show => ForestView(&store.snapshot()).to_string(),
        ShellCommand::Ids => flatten_ids(&store.snapshot())
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => "bye".to_string(),
    }
}

fn changed(changed: bool, verb: &str, id: &NodeId) -> String {
    if changed {
        format!("{verb} {id}")
    } else {
        format!("no change for {id}")
    }
}

async fn write<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), ShellError> {
    let text = text.trim_end_matches('\n');
    output
        .write_all(format!("{text}\n").as_bytes())
        .await
        .map_err(ShellError::Write)?;
    output.flush().await.map_err(ShellError::Write)
}
