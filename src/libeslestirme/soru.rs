use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot read question file {0}: {1}")]
    FileRead(PathBuf, #[source] std::io::Error),
    #[error("malformed question file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("question fetch was interrupted")]
    Interrupted,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuizItem {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub matching: Option<Matching>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Matching {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub questions: Vec<MatchingQuestion>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchingQuestion {
    pub title: String,
    pub question: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Vec<String>,
}

pub fn find_matching(items: &[QuizItem], matching_id: &str) -> Option<Matching> {
    items
        .iter()
        .filter_map(|item| item.matching.as_ref())
        .find(|matching| matching.id == matching_id)
        .cloned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptContent<'a> {
    Text(&'a str),
    Image(&'a str),
}

pub fn classify_prompt(text: &str) -> PromptContent<'_> {
    if text.starts_with("http://") || text.starts_with("https://") {
        PromptContent::Image(text)
    } else {
        PromptContent::Text(text)
    }
}

pub struct Fetch {
    rx: Receiver<Result<Vec<QuizItem>, FetchError>>,
    handle: Option<JoinHandle<()>>,
}

impl Fetch {
    pub fn spawn(path: PathBuf) -> Fetch {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let now = Instant::now();
            let result = load_items(&path);
            debug!(
                "[Fetch] Resolved {:?} in {} ms.",
                path,
                now.elapsed().as_millis()
            );
            if tx.send(result).is_err() {
                warn!("[Fetch] Receiver went away before the question set arrived.");
            }
        });
        Fetch {
            rx,
            handle: Some(handle),
        }
    }

    /// None while the question set is still loading.
    pub fn poll(&mut self) -> Option<Result<Vec<QuizItem>, FetchError>> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(FetchError::Interrupted))
            }
        }
    }

    pub fn wait(mut self) -> Result<Vec<QuizItem>, FetchError> {
        let result = self.rx.recv().unwrap_or(Err(FetchError::Interrupted));
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("[Fetch] Fetch thread panicked.");
            }
        }
    }
}

impl Drop for Fetch {
    fn drop(&mut self) {
        self.join();
    }
}

fn load_items(path: &Path) -> Result<Vec<QuizItem>, FetchError> {
    let json =
        fs::read_to_string(path).map_err(|err| FetchError::FileRead(path.to_path_buf(), err))?;
    let items = serde_json::from_str(&json)?;
    Ok(items)
}
