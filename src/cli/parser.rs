/// A parsed `gh atat` invocation.
#[derive(Debug, PartialEq)]
pub enum Command {
    Login,
    Whoami,
    Push,
    Pull,
    RemoteList,
    RemoteAdd { repo: String },
    RemoteRemove { repo: String },
    Help,
    /// Unrecognised input; carries the message shown to the user.
    Unknown(String),
}

const REMOTE_SUBCOMMANDS: &[&str] = &["add", "remove"];

/// Turns `args` (program name first) into a [`Command`].
///
/// Only `remote add|remove` takes an argument; anything after the repository is ignored.
pub fn parse_args(args: &[String]) -> Command {
    let words: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    match words.as_slice() {
        [] => Command::Help,
        [command] => match *command {
            "login" => Command::Login,
            "whoami" => Command::Whoami,
            "push" => Command::Push,
            "pull" => Command::Pull,
            "remote" => Command::RemoteList,
            "help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        },
        ["remote", sub] if REMOTE_SUBCOMMANDS.contains(sub) => Command::Unknown(format!(
            "Missing repository argument. Usage: gh atat remote {sub} <owner>/<repo>"
        )),
        ["remote", sub, ..] if !REMOTE_SUBCOMMANDS.contains(sub) => {
            Command::Unknown(format!("remote {sub}"))
        }
        ["remote", _, repo, ..] if !is_valid_repository(repo) => Command::Unknown(
            "Invalid repository format. Please use <owner>/<repo>.".to_string(),
        ),
        ["remote", "add", repo, ..] => Command::RemoteAdd {
            repo: repo.to_string(),
        },
        ["remote", _, repo, ..] => Command::RemoteRemove {
            repo: repo.to_string(),
        },
        [command, _] => Command::Unknown(command.to_string()),
        [first, second, ..] => Command::Unknown(format!("{first} {second}")),
    }
}

/// `<owner>/<repo>` with both parts non-empty.
fn is_valid_repository(repo: &str) -> bool {
    matches!(
        repo.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    )
}
