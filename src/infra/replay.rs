use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::macros::format_description;

/// Raw copy of every protocol line consumed during a game. The file can be fed back
/// through `BLASTBOT_INPUT` to replay the game offline.
pub struct ReplayFile {
    path: PathBuf,
    file: File,
}

impl ReplayFile {
    pub fn new(replays_folder: impl AsRef<Path>) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let date_time_str = now
            .format(format_description!("[year][month][day]-[hour][minute][second]"))
            .map_err(io::Error::other)?;

        let folder = replays_folder.as_ref();
        if !folder.exists() {
            std::fs::create_dir_all(folder)?;
        }

        let path = folder.join(format!("blastbot - {}.txt", date_time_str));
        let file = File::create(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()
    }
}
