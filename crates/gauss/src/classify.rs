//! Deciding how a Gaussian job ended from the last line of its log file

use std::path::Path;

use regex::Regex;

use crate::Error;

/// What a matching [Signature] says about a job
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    /// the job terminated normally
    Complete,

    /// the job died in a known way and needs to be restarted
    Failed,
}

/// A named pattern tested against the trimmed last line of a log file
#[derive(Clone, Debug)]
pub struct Signature {
    pub name: &'static str,
    pub class: Class,
    pattern: Regex,
}

impl Signature {
    /// compile `pattern` into a new `Signature`. panics if `pattern` is not a
    /// valid regular expression, so it should only be called with literals
    pub fn new(name: &'static str, pattern: &str, class: Class) -> Self {
        Self {
            name,
            class,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// An ordered collection of [Signature]s. The first one matching a line wins
#[derive(Clone, Debug)]
pub struct SignatureSet(Vec<Signature>);

impl SignatureSet {
    pub fn new(signatures: Vec<Signature>) -> Self {
        Self(signatures)
    }

    /// The known ways for Gaussian to die abruptly, usually from a problem
    /// with the node it ran on rather than with the input
    pub fn failures() -> Self {
        Self(vec![
            Signature::new("FAIL_OPEN_FILE", r"^open-new-file", Class::Failed),
            Signature::new(
                "FAIL_FILE_LEN",
                r"^File lengths \(MBytes\):\s*RWF=",
                Class::Failed,
            ),
            Signature::new(
                "FAIL_RDCARD",
                r"^In source file rdcard",
                Class::Failed,
            ),
            Signature::new(
                "FAIL_NTR",
                r"^NtrErr Called from FileIO",
                Class::Failed,
            ),
        ])
    }

    /// [SignatureSet::failures] preceded by the normal termination message
    pub fn with_completion() -> Self {
        let mut sigs = vec![Signature::new(
            "NORMAL_TERM",
            r"^Normal termination of Gaussian",
            Class::Complete,
        )];
        sigs.extend(Self::failures().0);
        Self(sigs)
    }

    /// return the first signature matching the trimmed `line`, if any. no
    /// later signatures are tested after a match
    pub fn classify(&self, line: &str) -> Option<&Signature> {
        let line = line.trim();
        self.0.iter().find(|sig| sig.is_match(line))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// return the last non-blank line of `path`, trimmed. an empty or
/// whitespace-only file is [Error::InvalidData]
pub fn last_line(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let contents = String::from_utf8_lossy(&bytes);
    contents
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "Could not read the last line (may be blank) of file: {}",
                path.display()
            ))
        })
}

/// The outcome of classifying a single file
#[derive(Debug)]
pub struct Verdict<'a> {
    pub last_line: String,
    pub signature: Option<&'a Signature>,
}

impl Verdict<'_> {
    /// whether the last line matched a failure signature
    pub fn needs_restart(&self) -> bool {
        self.signature.is_some_and(|s| s.class == Class::Failed)
    }

    pub fn is_complete(&self) -> bool {
        self.signature.is_some_and(|s| s.class == Class::Complete)
    }
}

impl SignatureSet {
    /// read the last line of `path` and classify it
    pub fn classify_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Verdict<'_>, Error> {
        let last_line = last_line(path)?;
        let signature = self.classify(&last_line);
        Ok(Verdict {
            last_line,
            signature,
        })
    }
}
