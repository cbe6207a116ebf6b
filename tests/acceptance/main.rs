use cucumber::World;
use std::process::ExitStatus;

#[derive(Debug, Default, World)]
pub struct AtatWorld {
    pub project_dir: Option<tempfile::TempDir>,
    pub captured_output: Vec<u8>,
    pub command_status: Option<ExitStatus>,
    pub original_todo_content: String,
}

impl AtatWorld {
    /// Temporary project directory, created on first use and removed with the world.
    pub fn project_path(&mut self) -> std::path::PathBuf {
        self.project_dir
            .get_or_insert_with(|| tempfile::tempdir().expect("Failed to create project dir"))
            .path()
            .to_path_buf()
    }
}

#[tokio::main]
async fn main() {
    AtatWorld::run("features").await;
}

mod steps;
