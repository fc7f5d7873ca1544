// interactive terminal session - a menu over the workflow controller

use anyhow::{Context, Result};
use console::style;
use crossterm::terminal::disable_raw_mode;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::Backend;
use crate::controller::{Action, WorkflowController};
use crate::source_file::read_text_file;
use crate::status::{Status, StatusKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    UploadPattern,
    UploadSource,
    Generate,
    ShowOutput,
    SaveOutput,
    ShowStatus,
    Quit,
}

const MENU: [MenuItem; 7] = [
    MenuItem::UploadPattern,
    MenuItem::UploadSource,
    MenuItem::Generate,
    MenuItem::ShowOutput,
    MenuItem::SaveOutput,
    MenuItem::ShowStatus,
    MenuItem::Quit,
];

pub async fn run_interactive<B: Backend>(controller: WorkflowController<B>) -> Result<()> {
    println!("{}", style("\nut-helper 🧪").cyan().bold());
    println!("{}\n", style("pattern-based unit test generator").dim());
    println!("{}", style("upload a pattern and a go source file, then generate").dim());

    loop {
        let items: Vec<String> = MENU.iter().map(|item| menu_label(&controller, *item)).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("what would you like to do?")
            .default(0)
            .items(&items)
            .interact()?;

        match MENU[selection] {
            MenuItem::UploadPattern => upload_pattern(&controller).await?,
            MenuItem::UploadSource => upload_source(&controller).await?,
            MenuItem::Generate => {
                // the item stays in the menu but does nothing until both uploads succeed
                if !controller.generate_enabled() {
                    println!(
                        "{}",
                        style("⚠️  upload a pattern and a source file first").yellow()
                    );
                    continue;
                }
                generate(&controller).await?;
            }
            MenuItem::ShowOutput => show_output(&controller),
            MenuItem::SaveOutput => save_output(&controller)?,
            MenuItem::ShowStatus => {
                let current = controller.status().current();
                if current.is_none() {
                    println!("{}", style("no status to show").dim());
                }
                print_status(current.as_ref());
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

fn menu_label<B>(controller: &WorkflowController<B>, item: MenuItem) -> String {
    match item {
        MenuItem::UploadPattern => {
            let label = controller.control_state(Action::UploadPattern).label;
            match controller.pattern() {
                Some(pattern) => format!("{label} (current: {})", pattern.name),
                None => label,
            }
        }
        MenuItem::UploadSource => {
            let label = controller.control_state(Action::UploadSource).label;
            match controller.source() {
                Some(source) => format!("{label} (current: {})", source.file_name),
                None => label,
            }
        }
        MenuItem::Generate => {
            let state = controller.control_state(Action::Generate);
            if state.enabled {
                state.label
            } else {
                format!("{} (disabled)", state.label)
            }
        }
        MenuItem::ShowOutput => "Show Output".to_string(),
        MenuItem::SaveOutput => "Save Output To File".to_string(),
        MenuItem::ShowStatus => "Show Status".to_string(),
        MenuItem::Quit => "Quit".to_string(),
    }
}

async fn upload_pattern<B: Backend>(controller: &WorkflowController<B>) -> Result<()> {
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("pattern name")
        .allow_empty(true)
        .interact_text()?;

    let sources = &["load from file", "write in editor"];
    let source = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("pattern content")
        .default(0)
        .items(sources)
        .interact()?;
    let content = match source {
        0 => match prompt_file("pattern file")? {
            Some(loaded) => loaded.content,
            None => return Ok(()),
        },
        _ => open_editor("")?,
    };

    let description: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("description (optional)")
        .allow_empty(true)
        .interact_text()?;

    let spinner = spinner("uploading pattern...");
    // the banner carries the outcome, the error itself is only worth a log line
    if let Err(e) = controller
        .submit_pattern(&name, &content, Some(&description))
        .await
    {
        tracing::debug!(%e, "pattern upload did not succeed");
    }
    spinner.finish_and_clear();
    print_status(controller.status().current().as_ref());
    Ok(())
}

async fn upload_source<B: Backend>(controller: &WorkflowController<B>) -> Result<()> {
    let Some(loaded) = prompt_file("go source file")? else {
        return Ok(());
    };
    let package: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("package name (optional)")
        .allow_empty(true)
        .interact_text()?;

    let spinner = spinner("uploading source file...");
    if let Err(e) = controller
        .submit_source_code(&loaded.file_name, &loaded.content, Some(&package))
        .await
    {
        tracing::debug!(%e, "source upload did not succeed");
    }
    spinner.finish_and_clear();
    print_status(controller.status().current().as_ref());
    Ok(())
}

async fn generate<B: Backend>(controller: &WorkflowController<B>) -> Result<()> {
    let wants_context = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("add additional context for the generator?")
        .default(false)
        .interact()?;
    let context = if wants_context {
        Some(open_editor("")?)
    } else {
        None
    };

    let spinner = spinner(crate::controller::GENERATING_PLACEHOLDER);
    let outcome = controller.generate_artifact(context.as_deref()).await;
    spinner.finish_and_clear();
    print_status(controller.status().current().as_ref());

    if outcome.is_ok() {
        show_output(controller);
    }
    Ok(())
}

fn show_output<B>(controller: &WorkflowController<B>) {
    let text = controller.output().text();
    if text.is_empty() {
        println!("{}", style("nothing generated yet").dim());
        return;
    }
    println!("\n{}", style("generated unit tests:").cyan().bold());
    println!("═══════════════════════════════════════");
    println!("{text}");
    println!("═══════════════════════════════════════\n");
}

fn save_output<B>(controller: &WorkflowController<B>) -> Result<()> {
    let text = controller.output().text();
    if text.is_empty() {
        println!("{}", style("nothing generated yet").dim());
        return Ok(());
    }

    let default_name = controller
        .source()
        .map(|source| test_file_name(&source.file_name))
        .unwrap_or_else(|| "generated_test.go".to_string());
    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("save to")
        .default(default_name)
        .interact_text()?;

    crate::write_output(&PathBuf::from(&path), &text)?;
    println!("{} {}", style("✅ saved to").green().bold(), style(&path).yellow());
    Ok(())
}

/// `handler.go` becomes `handler_test.go`
fn test_file_name(file_name: &str) -> String {
    let segment = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match segment.strip_suffix(".go") {
        Some(stem) => format!("{stem}_test.go"),
        None => format!("{segment}_test"),
    }
}

fn prompt_file(prompt: &str) -> Result<Option<crate::source_file::LoadedFile>> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()?;
    match read_text_file(&PathBuf::from(raw.trim())) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) => {
            println!("{} {}", style("❌").red(), style(format!("{e:#}")).red());
            Ok(None)
        }
    }
}

fn open_editor(initial: &str) -> Result<String> {
    // dialoguer can leave the terminal in raw mode; editors need it cooked
    let _ = disable_raw_mode();
    let text = edit::edit(initial).context("failed to open editor")?;
    Ok(text.trim_end().to_string())
}

/// spinner shown while a request is in flight
pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// render the banner the way the terminal shows it
pub fn print_status(status: Option<&Status>) {
    if let Some(status) = status {
        println!("{}", status_line(status));
    }
}

/// one styled line for a status, wherever it ends up being written
pub fn status_line(status: &Status) -> String {
    match status.kind {
        StatusKind::Success => style(format!("✅ {}", status.message)).green().bold().to_string(),
        StatusKind::Error => style(format!("❌ {}", status.message)).red().bold().to_string(),
        StatusKind::Info => style(format!("ℹ️  {}", status.message)).cyan().to_string(),
    }
}
