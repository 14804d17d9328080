//! One-shot command handlers talking to a running server.

use anyhow::{Result, bail};
use taskdeck_app::{TaskRepository, TasksApi};
use taskdeck_core::id::TaskId;

use crate::Command;

/// Execute a one-shot command and print its outcome.
///
/// Mutations refetch before printing so the on-disk mirror reflects the
/// change even though the process exits right after.
pub fn run<A: TasksApi>(command: Command, repo: &mut TaskRepository<A>) -> Result<()> {
    match command {
        Command::Ls => ls(repo),

        Command::Add { title } => {
            let task = repo.create(&title)?;
            repo.tasks()?;
            println!("created {}: {}", task.id, task.title);
            Ok(())
        }

        Command::Done { id } => {
            let task = repo.set_completed(TaskId(id), true)?;
            repo.tasks()?;
            println!("completed {}: {}", task.id, task.title);
            Ok(())
        }

        Command::Reopen { id } => {
            let task = repo.set_completed(TaskId(id), false)?;
            repo.tasks()?;
            println!("reopened {}: {}", task.id, task.title);
            Ok(())
        }

        Command::Rename { id, title } => {
            let task = repo.rename(TaskId(id), &title)?;
            repo.tasks()?;
            println!("renamed {}: {}", task.id, task.title);
            Ok(())
        }

        Command::Rm { id } => {
            repo.remove(TaskId(id))?;
            repo.tasks()?;
            println!("deleted {id}");
            Ok(())
        }

        Command::Clear => {
            repo.clear_completed()?;
            repo.tasks()?;
            println!("cleared completed tasks");
            Ok(())
        }

        Command::Serve { .. } | Command::Tui => bail!("not a one-shot command"),
    }
}

fn ls<A: TasksApi>(repo: &mut TaskRepository<A>) -> Result<()> {
    let tasks = repo.tasks()?;
    if tasks.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        println!("[{mark}] {:>4}  {}", task.id, task.title);
    }
    Ok(())
}
