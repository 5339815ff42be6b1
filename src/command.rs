//! Command registry and dispatch.
//!
//! Commands are declared in a static table pairing a kebab-case name with
//! its positional argument names and the [`Operation`] it runs. The same
//! table drives argument validation and usage output, so the usage text
//! always matches what dispatch accepts.
use color_eyre::eyre::WrapErr;
use std::path::Path;

use crate::{
    Result,
    error::ReleaseHelperError,
    forge::traits::{AssetFetcher, ReleaseApi},
    release,
};

/// Operations that can be invoked from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DraftRelease,
    UploadAsset,
    UploadAllAssets,
    DownloadAllAssets,
    PublishRelease,
    UpdateReleaseBody,
    GetRelease,
}

/// A registered command: name, positional argument names and operation.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub args: &'static [&'static str],
    pub operation: Operation,
}

impl CommandSpec {
    /// Command name followed by each argument name in angle brackets.
    pub fn usage_line(&self) -> String {
        std::iter::once(self.name.to_string())
            .chain(self.args.iter().map(|arg| format!("<{arg}>")))
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Every command the tool accepts.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "draft-release",
        args: &["tag-name"],
        operation: Operation::DraftRelease,
    },
    CommandSpec {
        name: "upload-asset",
        args: &["release-id", "asset-path"],
        operation: Operation::UploadAsset,
    },
    CommandSpec {
        name: "upload-all-assets",
        args: &["release-id", "folder-path"],
        operation: Operation::UploadAllAssets,
    },
    CommandSpec {
        name: "download-all-assets",
        args: &["release-id", "output-path"],
        operation: Operation::DownloadAllAssets,
    },
    CommandSpec {
        name: "publish-release",
        args: &["release-id"],
        operation: Operation::PublishRelease,
    },
    CommandSpec {
        name: "update-release-body",
        args: &["release-id", "body"],
        operation: Operation::UpdateReleaseBody,
    },
    CommandSpec {
        name: "get-release",
        args: &["release-id"],
        operation: Operation::GetRelease,
    },
];

/// Convert a camelCase or PascalCase identifier to kebab-case by splitting
/// before each uppercase letter and lowercasing every segment.
pub fn kebabify(identifier: &str) -> String {
    let mut kebab = String::with_capacity(identifier.len() + 4);

    for (i, c) in identifier.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                kebab.push('-');
            }
            kebab.extend(c.to_lowercase());
        } else {
            kebab.push(c);
        }
    }

    kebab
}

/// Look up a registered command by name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|command| command.name == name)
}

/// Usage text listing every registered command.
pub fn usage(program: &str) -> String {
    let mut lines = vec!["Usage:".to_string()];

    for command in COMMANDS {
        lines.push(format!("  {program} {}", command.usage_line()));
    }

    lines.join("\n")
}

/// A command that passed validation, ready to execute.
#[derive(Debug)]
pub struct Invocation {
    command: &'static CommandSpec,
    args: Vec<String>,
}

impl Invocation {
    pub fn command(&self) -> &'static CommandSpec {
        self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Validate a command name and its arguments without touching the network.
pub fn resolve(
    command: Option<&str>,
    args: &[String],
) -> std::result::Result<Invocation, ReleaseHelperError> {
    let name = match command {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ReleaseHelperError::MissingCommand),
    };

    let spec = find(name)
        .ok_or_else(|| ReleaseHelperError::UnknownCommand(name.into()))?;

    if args.len() != spec.args.len() {
        return Err(ReleaseHelperError::WrongArgumentCount {
            command: spec.name.into(),
            expected: spec.args.len(),
            actual: args.len(),
            usage: spec.usage_line(),
        });
    }

    Ok(Invocation {
        command: spec,
        args: args.to_vec(),
    })
}

/// Run a validated invocation. Returns the text to print, if any.
pub async fn execute(
    api: &dyn ReleaseApi,
    fetcher: &dyn AssetFetcher,
    invocation: Invocation,
) -> Result<Option<String>> {
    let name = invocation.command.name;

    run(api, fetcher, invocation.command.operation, &invocation.args)
        .await
        .wrap_err_with(|| format!("Command failed: {name}"))
}

/// Resolve and execute in one step.
pub async fn dispatch(
    api: &dyn ReleaseApi,
    fetcher: &dyn AssetFetcher,
    command: Option<&str>,
    args: &[String],
) -> Result<Option<String>> {
    let invocation = resolve(command, args)?;
    execute(api, fetcher, invocation).await
}

// args has already been checked against the command's argument list
async fn run(
    api: &dyn ReleaseApi,
    fetcher: &dyn AssetFetcher,
    operation: Operation,
    args: &[String],
) -> Result<Option<String>> {
    match operation {
        Operation::DraftRelease => {
            let id = release::draft_release(api, &args[0]).await?;
            Ok(Some(id.to_string()))
        }
        Operation::UploadAsset => {
            let release_id = release::parse_release_id(&args[0])?;
            release::upload_asset(api, release_id, Path::new(&args[1]))
                .await?;
            Ok(None)
        }
        Operation::UploadAllAssets => {
            let release_id = release::parse_release_id(&args[0])?;
            release::upload_all_assets(api, release_id, Path::new(&args[1]))
                .await?;
            Ok(None)
        }
        Operation::DownloadAllAssets => {
            let release_id = release::parse_release_id(&args[0])?;
            release::download_all_assets(
                api,
                fetcher,
                release_id,
                Path::new(&args[1]),
            )
            .await?;
            Ok(None)
        }
        Operation::PublishRelease => {
            let release_id = release::parse_release_id(&args[0])?;
            release::publish_release(api, release_id).await?;
            Ok(None)
        }
        Operation::UpdateReleaseBody => {
            let release_id = release::parse_release_id(&args[0])?;
            release::update_release_body(api, release_id, &args[1]).await?;
            Ok(None)
        }
        Operation::GetRelease => {
            let release_id = release::parse_release_id(&args[0])?;
            let release = release::get_release(api, release_id).await?;
            Ok(Some(serde_json::to_string_pretty(&release)?))
        }
    }
}
