use quire::{Chapter, Compiler, CompilerError, Page};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// One recorded compiler invocation.
#[derive(Debug, Clone)]
pub struct CompileCall {
    pub target: String,
    pub offset: u32,
    pub flags: Vec<String>,
}

/// In-memory stand-in for the external typesetter.
///
/// `compile` writes the simulated page count into the output file as text
/// and `page_count` parses it back, so the real measure-after-render path
/// of the scheduler is exercised. Targets can be given fixed counts, made
/// to fail, or made offset-dependent (count 2 on even offsets, 1 on odd)
/// to model pagination that never settles.
#[derive(Default)]
pub struct FakeCompiler {
    counts: Mutex<HashMap<String, u32>>,
    failing: Mutex<HashSet<String>>,
    offset_dependent: Mutex<HashSet<String>>,
    calls: Mutex<Vec<CompileCall>>,
    delay: Option<Duration>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every `compile`, to widen concurrency windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_count(&self, target: &str, count: u32) {
        self.counts.lock().unwrap().insert(target.to_string(), count);
    }

    pub fn fail_on(&self, target: &str) {
        self.failing.lock().unwrap().insert(target.to_string());
    }

    pub fn depend_on_offset(&self, target: &str) {
        self.offset_dependent
            .lock()
            .unwrap()
            .insert(target.to_string());
    }

    pub fn calls(&self) -> Vec<CompileCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn times_compiled(&self, target: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.target == target)
            .count()
    }

    pub fn offsets_seen(&self, target: &str) -> Vec<u32> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.target == target)
            .map(|c| c.offset)
            .collect()
    }
}

impl Compiler for FakeCompiler {
    fn compile(
        &self,
        target: &str,
        output: &Path,
        page_offset: u32,
        extra_flags: &[String],
    ) -> Result<(), CompilerError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.calls.lock().unwrap().push(CompileCall {
            target: target.to_string(),
            offset: page_offset,
            flags: extra_flags.to_vec(),
        });

        if self.failing.lock().unwrap().contains(target) {
            return Err(CompilerError::Failed(format!(
                "simulated compile error for {target}"
            )));
        }

        let count = if self.offset_dependent.lock().unwrap().contains(target) {
            if page_offset % 2 == 0 { 2 } else { 1 }
        } else {
            self.counts.lock().unwrap().get(target).copied().unwrap_or(1)
        };
        std::fs::write(output, count.to_string())?;
        Ok(())
    }

    fn page_count(&self, output: &Path) -> Result<u32, CompilerError> {
        let text = std::fs::read_to_string(output)?;
        text.trim()
            .parse()
            .map_err(|e| CompilerError::PageCount {
                path: output.to_path_buf(),
                reason: format!("{e}"),
            })
    }
}

/// A hierarchy of `chapters` chapters with `pages` pages each.
pub fn hierarchy(chapters: usize, pages: usize) -> Vec<Chapter> {
    (0..chapters)
        .map(|ci| Chapter {
            title: format!("Chapter {ci}"),
            number: None,
            pages: (0..pages)
                .map(|pi| Page {
                    title: format!("Section {ci}.{pi}"),
                    number: None,
                })
                .collect(),
        })
        .collect()
}
