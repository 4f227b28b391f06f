//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against an [`NgramMatcher`].
//!
//! A fixture is a dictionary plus an ordered list of cases. Cases run in
//! sequence against one matcher, so a `delete` case affects every case
//! after it.
//!
//! ```yaml
//! name: longest_match
//! description: the longer ngram wins
//! dictionary:
//!   - { value: X, ngram: [a] }
//!   - { value: Y, ngram: [a, b] }
//! cases:
//!   - name: prefers a b
//!     match: [a, b]
//!     expect: [Y]
//!   - name: spans
//!     match_spans: [a, b]
//!     expect: [[Y, 0, 2]]
//! ```

use ngram::NgramMatcher;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dictionary: Vec<DictionaryEntry>,
    pub cases: Vec<TestCase>,
}

/// One dictionary entry, inserted in file order
#[derive(Debug, Deserialize)]
pub struct DictionaryEntry {
    pub value: String,
    pub ngram: Vec<String>,
}

/// Test case: one operation and its expected outcome.
/// Uses untagged deserialization; each variant has a unique operation key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TestCase {
    Match(MatchCase),
    MatchSpans(MatchSpansCase),
    Get(GetCase),
    Contains(ContainsCase),
    Delete(DeleteCase),
    Keys(KeysCase),
    Count(CountCase),
}

#[derive(Debug, Deserialize)]
pub struct MatchCase {
    pub name: String,
    #[serde(rename = "match")]
    pub input: Vec<String>,
    pub expect: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchSpansCase {
    pub name: String,
    pub match_spans: Vec<String>,
    pub expect: Vec<(String, usize, usize)>,
}

#[derive(Debug, Deserialize)]
pub struct GetCase {
    pub name: String,
    pub get: Vec<String>,
    #[serde(default)]
    pub expect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContainsCase {
    pub name: String,
    pub contains: Vec<String>,
    pub expect: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCase {
    pub name: String,
    pub delete: Vec<String>,
    pub expect: bool,
}

/// Expected set of stored ngrams; order is ignored
#[derive(Debug, Deserialize)]
pub struct KeysCase {
    pub name: String,
    pub keys: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CountCase {
    pub name: String,
    pub count: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert fixture to an NgramMatcher
// ═══════════════════════════════════════════════════════════════════════════════

impl Fixture {
    /// Build a matcher from the dictionary, inserting in file order
    pub fn build(&self) -> NgramMatcher<String> {
        self.dictionary
            .iter()
            .map(|entry| (&entry.ngram, entry.value.clone()))
            .collect()
    }
}

impl TestCase {
    pub fn name(&self) -> &str {
        match self {
            TestCase::Match(c) => &c.name,
            TestCase::MatchSpans(c) => &c.name,
            TestCase::Get(c) => &c.name,
            TestCase::Contains(c) => &c.name,
            TestCase::Delete(c) => &c.name,
            TestCase::Keys(c) => &c.name,
            TestCase::Count(c) => &c.name,
        }
    }

    /// Run this case against `matcher`, returning (expected, actual) in
    /// Debug form.
    fn run(&self, matcher: &mut NgramMatcher<String>) -> (String, String) {
        match self {
            TestCase::Match(c) => {
                let actual: Vec<&String> = matcher.match_ngrams(&c.input);
                (format!("{:?}", c.expect), format!("{actual:?}"))
            }
            TestCase::MatchSpans(c) => {
                let actual: Vec<(&String, usize, usize)> = matcher
                    .match_spans(&c.match_spans)
                    .into_iter()
                    .map(Into::into)
                    .collect();
                (format!("{:?}", c.expect), format!("{actual:?}"))
            }
            TestCase::Get(c) => (
                format!("{:?}", c.expect.as_ref()),
                format!("{:?}", matcher.get(&c.get)),
            ),
            TestCase::Contains(c) => (
                format!("{:?}", c.expect),
                format!("{:?}", matcher.contains(&c.contains)),
            ),
            TestCase::Delete(c) => (
                format!("{:?}", c.expect),
                format!("{:?}", matcher.delete(&c.delete)),
            ),
            TestCase::Keys(c) => {
                let mut expected = c.keys.clone();
                expected.sort();
                let mut actual: Vec<Vec<String>> = matcher
                    .keys()
                    .into_iter()
                    .map(|key| key.into_iter().map(String::from).collect())
                    .collect();
                actual.sort();
                // Enumeration and the O(1) count must agree.
                let count = matcher.len();
                (
                    format!("{expected:?} (count {})", expected.len()),
                    format!("{actual:?} (count {count})"),
                )
            }
            TestCase::Count(c) => (format!("{:?}", c.count), format!("{:?}", matcher.len())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

/// Run `cases` in order against one matcher.
pub(crate) fn run_cases(matcher: &mut NgramMatcher<String>, cases: &[TestCase]) -> Vec<CaseResult> {
    cases
        .iter()
        .map(|case| {
            let (expected, actual) = case.run(matcher);
            CaseResult {
                case_name: case.name().to_string(),
                passed: expected == actual,
                expected,
                actual,
            }
        })
        .collect()
}

/// Errors from loading fixture files
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("fixtures directory does not exist: {}", .0.display())]
    MissingDir(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Read every `.yaml`/`.yml` file in `dir`, sorted by path.
pub(crate) fn read_yaml_dir(dir: &Path) -> Result<Vec<(PathBuf, String)>, FixtureError> {
    if !dir.is_dir() {
        return Err(FixtureError::MissingDir(dir.to_path_buf()));
    }

    let read_err = |source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| match fs::read_to_string(&path) {
            Ok(yaml) => Ok((path, yaml)),
            Err(source) => Err(FixtureError::Io { path, source }),
        })
        .collect()
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Load every fixture from the `.yaml`/`.yml` files in `dir`, sorted by path
    pub fn load_dir(dir: &Path) -> Result<Vec<(PathBuf, Vec<Self>)>, FixtureError> {
        read_yaml_dir(dir)?
            .into_iter()
            .map(|(path, yaml)| match Self::from_yaml_multi(&yaml) {
                Ok(fixtures) => Ok((path, fixtures)),
                Err(source) => Err(FixtureError::Yaml { path, source }),
            })
            .collect()
    }

    /// Run all test cases in order and return results
    pub fn run(&self) -> Vec<CaseResult> {
        run_cases(&mut self.build(), &self.cases)
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = r"
name: canonical
description: the example sentence
dictionary:
  - { value: programming language, ngram: [programming, language] }
  - { value: Python, ngram: [Python] }
cases:
  - name: values
    match: [Python, is, a, programming, language]
    expect: [Python, programming language]
  - name: spans
    match_spans: [Python, is, a, programming, language]
    expect: [[Python, 0, 1], [programming language, 3, 5]]
  - name: get present
    get: [Python]
    expect: Python
  - name: get absent
    get: [Java]
  - name: contains prefix only
    contains: [programming]
    expect: false
  - name: delete
    delete: [Python]
    expect: true
  - name: keys after delete
    keys: [[programming, language]]
  - name: count after delete
    count: 1
";

    #[test]
    fn parses_every_case_kind() {
        let fixture = Fixture::from_yaml(CANONICAL).unwrap();
        assert_eq!(fixture.dictionary.len(), 2);
        assert!(matches!(fixture.cases[0], TestCase::Match(_)));
        assert!(matches!(fixture.cases[1], TestCase::MatchSpans(_)));
        assert!(matches!(fixture.cases[2], TestCase::Get(_)));
        assert!(matches!(fixture.cases[3], TestCase::Get(GetCase { expect: None, .. })));
        assert!(matches!(fixture.cases[4], TestCase::Contains(_)));
        assert!(matches!(fixture.cases[5], TestCase::Delete(_)));
        assert!(matches!(fixture.cases[6], TestCase::Keys(_)));
        assert!(matches!(fixture.cases[7], TestCase::Count(_)));
    }

    #[test]
    fn runs_cases_in_order() {
        let fixture = Fixture::from_yaml(CANONICAL).unwrap();
        for result in fixture.run() {
            assert!(
                result.passed,
                "{}: expected {}, got {}",
                result.case_name, result.expected, result.actual
            );
        }
    }

    #[test]
    fn reports_failures() {
        let yaml = r"
name: wrong
dictionary:
  - { value: X, ngram: [a] }
cases:
  - name: expects too much
    match: [a]
    expect: [X, X]
";
        let results = Fixture::from_yaml(yaml).unwrap().run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, r#"["X"]"#);
    }

    #[test]
    fn parses_multiple_documents() {
        let yaml = "name: one\ndictionary: []\ncases: []\n---\nname: two\ndictionary: []\ncases: []\n";
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "two");
    }

    #[test]
    fn missing_dir_is_an_error() {
        let err = Fixture::load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, FixtureError::MissingDir(_)));
        assert!(err.to_string().contains("/definitely/not/here"));
    }
}
