//! Package install descriptions and version constraints.
//!
//! A remediation effect is a data value: what to install, from where, with
//! which switches. Rendering to pip argv happens in one place so the same
//! spec can be logged, diffed in a dry run, and replayed in tests.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// One pip install invocation, described as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Requirement strings installed together (e.g. `torch==2.6.0`), or a
    /// single VCS URL (`git+https://...`).
    pub requirements: Vec<String>,

    /// Extra index URL (`--extra-index-url`), used for CUDA wheel indexes.
    pub extra_index_url: Option<String>,

    /// Allow pre-release versions (`--pre`).
    pub pre: bool,

    /// Reinstall even if already satisfied (`--force-reinstall`).
    pub force_reinstall: bool,

    /// Build a distribution from source (`--no-binary <name>`).
    pub no_binary: Option<String>,
}

impl PackageSpec {
    /// Spec for a single requirement string.
    pub fn new(requirement: impl Into<String>) -> Self {
        Self {
            requirements: vec![requirement.into()],
            extra_index_url: None,
            pre: false,
            force_reinstall: false,
            no_binary: None,
        }
    }

    /// Spec for several requirements resolved and installed together.
    pub fn group<I, S>(requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requirements: requirements.into_iter().map(Into::into).collect(),
            extra_index_url: None,
            pre: false,
            force_reinstall: false,
            no_binary: None,
        }
    }

    /// Add an extra index URL.
    pub fn extra_index(mut self, url: impl Into<String>) -> Self {
        self.extra_index_url = Some(url.into());
        self
    }

    /// Allow pre-releases.
    pub fn pre(mut self) -> Self {
        self.pre = true;
        self
    }

    /// Force reinstall.
    pub fn force_reinstall(mut self) -> Self {
        self.force_reinstall = true;
        self
    }

    /// Build the named distribution from source.
    pub fn no_binary(mut self, name: impl Into<String>) -> Self {
        self.no_binary = Some(name.into());
        self
    }

    /// Render the `pip install` argument list for this spec.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.requirements.clone();
        if let Some(url) = &self.extra_index_url {
            args.push("--extra-index-url".to_string());
            args.push(url.clone());
        }
        if self.pre {
            args.push("--pre".to_string());
        }
        if self.force_reinstall {
            args.push("--force-reinstall".to_string());
        }
        if let Some(name) = &self.no_binary {
            args.push("--no-binary".to_string());
            args.push(name.clone());
        }
        args
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)").expect("static regex"));

/// Extract the distribution name from a requirement string
/// (`gradio==3.41.2` → `gradio`). Returns the input unchanged for VCS URLs.
pub fn requirement_name(requirement: &str) -> &str {
    RE_NAME
        .find(requirement)
        .map(|m| m.as_str())
        .unwrap_or(requirement)
}

/// A version constraint over an installed distribution, e.g.
/// `==3.41.2` or `>=1.10.0,<2.0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    clauses: Vec<(Op, Vec<u32>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
}

/// Parse a version string into numeric components, ignoring local suffixes
/// (`2.6.0+cu121` → `[2, 6, 0]`).
pub fn parse_version(version: &str) -> Vec<u32> {
    let cleaned = version.split('+').next().unwrap_or(version);
    cleaned
        .split('.')
        .map_while(|part| {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .collect()
}

fn compare(a: &[u32], b: &[u32]) -> std::cmp::Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            std::cmp::Ordering::Equal => continue,
            other => return other,
        }
    }
    std::cmp::Ordering::Equal
}

impl Constraint {
    /// Parse a comma-separated constraint list. Unparseable clauses are
    /// dropped (best-effort, like the scripts this replaces).
    pub fn parse(text: &str) -> Self {
        let mut clauses = Vec::new();
        for raw in text.split(',') {
            let raw = raw.trim();
            let (op, rest) = if let Some(rest) = raw.strip_prefix("==") {
                (Op::Eq, rest)
            } else if let Some(rest) = raw.strip_prefix("!=") {
                (Op::Ne, rest)
            } else if let Some(rest) = raw.strip_prefix(">=") {
                (Op::Ge, rest)
            } else if let Some(rest) = raw.strip_prefix("<=") {
                (Op::Le, rest)
            } else if let Some(rest) = raw.strip_prefix('>') {
                (Op::Gt, rest)
            } else if let Some(rest) = raw.strip_prefix('<') {
                (Op::Lt, rest)
            } else {
                continue;
            };
            clauses.push((op, parse_version(rest.trim())));
        }
        Self { clauses }
    }

    /// Check whether an installed version satisfies every clause.
    pub fn matches(&self, version: &str) -> bool {
        use std::cmp::Ordering::*;
        let v = parse_version(version);
        self.clauses.iter().all(|(op, bound)| {
            let ord = compare(&v, bound);
            match op {
                Op::Eq => ord == Equal,
                Op::Ne => ord != Equal,
                Op::Ge => ord != Less,
                Op::Gt => ord == Greater,
                Op::Le => ord != Greater,
                Op::Lt => ord == Less,
            }
        })
    }

    /// True when no clause parsed (any version satisfies).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_renders_single_requirement() {
        let spec = PackageSpec::new("gradio==3.41.2");
        assert_eq!(spec.to_args(), vec!["gradio==3.41.2"]);
    }

    #[test]
    fn spec_renders_group_with_index_and_force() {
        let spec = PackageSpec::group(["torch==2.6.0", "torchvision==0.21.0"])
            .extra_index("https://download.pytorch.org/whl/cu121")
            .force_reinstall();
        let args = spec.to_args();
        assert_eq!(args[0], "torch==2.6.0");
        assert_eq!(args[1], "torchvision==0.21.0");
        assert!(args.contains(&"--extra-index-url".to_string()));
        assert!(args.contains(&"https://download.pytorch.org/whl/cu121".to_string()));
        assert!(args.contains(&"--force-reinstall".to_string()));
    }

    #[test]
    fn spec_renders_pre_and_no_binary() {
        let spec = PackageSpec::new("xformers").pre().no_binary("xformers");
        let args = spec.to_args();
        assert!(args.contains(&"--pre".to_string()));
        let pos = args.iter().position(|a| a == "--no-binary").unwrap();
        assert_eq!(args[pos + 1], "xformers");
    }

    #[test]
    fn spec_display_is_deterministic() {
        let spec = PackageSpec::new("numpy>=2.0.2");
        assert_eq!(spec.to_string(), spec.to_string());
    }

    #[test]
    fn requirement_name_strips_constraint() {
        assert_eq!(requirement_name("gradio==3.41.2"), "gradio");
        assert_eq!(requirement_name("pydantic>=1.10.0,<2.0.0"), "pydantic");
        assert_eq!(requirement_name("open-clip-torch"), "open-clip-torch");
    }

    #[test]
    fn parse_version_handles_local_suffix() {
        assert_eq!(parse_version("2.6.0+cu121"), vec![2, 6, 0]);
        assert_eq!(parse_version("3.41.2"), vec![3, 41, 2]);
    }

    #[test]
    fn parse_version_stops_at_non_numeric() {
        assert_eq!(parse_version("1.10.0rc1"), vec![1, 10, 0]);
    }

    #[test]
    fn constraint_exact_match() {
        let c = Constraint::parse("==3.41.2");
        assert!(c.matches("3.41.2"));
        assert!(!c.matches("4.44.0"));
    }

    #[test]
    fn constraint_range_match() {
        let c = Constraint::parse(">=1.10.0,<2.0.0");
        assert!(c.matches("1.10.22"));
        assert!(!c.matches("2.0.0"));
        assert!(!c.matches("1.9.9"));
    }

    #[test]
    fn constraint_ge_with_cuda_suffix() {
        let c = Constraint::parse(">=2.0.2");
        assert!(c.matches("2.0.2+cu121"));
        assert!(c.matches("2.1.0"));
        assert!(!c.matches("1.26.4"));
    }

    #[test]
    fn constraint_missing_components_are_zero() {
        let c = Constraint::parse(">=2.0");
        assert!(c.matches("2"));
        assert!(c.matches("2.0.0"));
        assert!(!c.matches("1.9"));
    }

    #[test]
    fn empty_constraint_matches_everything() {
        let c = Constraint::parse("");
        assert!(c.is_empty());
        assert!(c.matches("0.0.1"));
    }
}
