use parttool_lib::{AlignmentResolver, Partition};
use std::io::{self, BufRead, Write};

/// Asks on the terminal whether each misaligned size should be rounded up.
///
/// An empty answer means yes. Read errors or a closed stdin count as no.
pub struct PromptResolver<R> {
    input: R,
}

impl PromptResolver<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> PromptResolver<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> AlignmentResolver for PromptResolver<R> {
    fn round_up(&mut self, partition: &Partition, suggested: u32) -> bool {
        let mut stderr = io::stderr();
        let _ = write!(
            stderr,
            "{} size is not aligned ({:#x}). Round up to {:#x}? [Y/n] ",
            partition.name, partition.size, suggested
        );
        let _ = stderr.flush();

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_read_line_by_line() {
        let part = Partition::new("blob", "data", "nvs", None, 0x1801);
        let mut resolver = PromptResolver::new("y\nno\n\n".as_bytes());
        assert!(resolver.round_up(&part, 0x2000));
        assert!(!resolver.round_up(&part, 0x2000));
        assert!(resolver.round_up(&part, 0x2000));
        // stdin closed
        assert!(!resolver.round_up(&part, 0x2000));
    }
}
