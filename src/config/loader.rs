//! Book loader
//!
//! Loading pipeline for a single book file:
//! 1. Size check against [`BookLimits::max_book_size`]
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing
//! 4. Deserialization to [`BookFile`]
//! 5. Validation
//!
//! [`BookLoader::load_books`] runs steps 1-4 for every configured book
//! file, takes from each file only the section its role names, and
//! validates the assembled result once so cross-book references resolve.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;

use crate::config::schema::{BookFile, BookFiles};
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the book loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for book size.
    pub limits: BookLimits,
}

/// Limits that keep a malformed or hostile book from exhausting memory.
#[derive(Debug, Clone)]
pub struct BookLimits {
    /// Maximum number of phase rings.
    pub max_phase_rings: usize,

    /// Maximum book file size in bytes.
    pub max_book_size: usize,
}

impl Default for BookLimits {
    fn default() -> Self {
        Self {
            max_phase_rings: env_or("ROADNET_MAX_PHASE_RINGS", 1000),
            max_book_size: env_or("ROADNET_MAX_BOOK_SIZE", 10 * 1024 * 1024),
        }
    }
}

/// Result of loading one or more book files.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated books.
    pub book: BookFile,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during book loading.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "warning: {} at {location}", self.message),
            None => write!(f, "warning: {}", self.message),
        }
    }
}

/// Book loader.
///
/// Parsed files are cached by path, so a document passed for several book
/// roles is read once.
#[derive(Debug)]
pub struct BookLoader {
    options: LoaderOptions,
    cache: HashMap<PathBuf, BookFile>,
}

impl BookLoader {
    /// Creates a new book loader with the given options.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    /// Creates a new book loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads and validates a single book file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A `${VAR:?message}` reference names an unset variable
    /// - YAML parsing fails or the file is empty
    /// - Validation fails
    pub fn load(&mut self, path: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let book = self.read(path, &mut warnings)?;
        self.validate(book, path.display().to_string(), warnings)
    }

    /// Loads and validates a book from in-memory YAML. `origin` names the
    /// source in errors and warnings.
    ///
    /// # Errors
    ///
    /// Same as [`BookLoader::load`], minus file access.
    pub fn load_from_str(&self, content: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let book = parse_book(content, origin, &mut warnings)?;
        self.validate(book, origin.display().to_string(), warnings)
    }

    /// Loads every configured book file and validates the assembled books.
    ///
    /// Each file contributes only its own section: the rule book file its
    /// `road_rulebook`, the traffic light book file its `traffic_lights`,
    /// and so on. Unconfigured roles stay `None`.
    ///
    /// # Errors
    ///
    /// Same as [`BookLoader::load`]. A configured file that lacks its
    /// section is a [`ConfigError::MissingRequired`].
    pub fn load_books(&mut self, files: &BookFiles) -> Result<LoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let mut assembled = BookFile::default();
        let mut sources: Vec<String> = Vec::new();

        if let Some(path) = &files.road_rule_book {
            let book = self.read(path, &mut warnings)?;
            assembled.road_rulebook = Some(section(book.road_rulebook, "road_rulebook", path)?);
            note_source(&mut sources, path);
        }
        if let Some(path) = &files.traffic_light_book {
            let book = self.read(path, &mut warnings)?;
            assembled.traffic_lights =
                Some(section(book.traffic_lights, "traffic_lights", path)?);
            note_source(&mut sources, path);
        }
        if let Some(path) = &files.phase_ring_book {
            let book = self.read(path, &mut warnings)?;
            assembled.phase_rings = Some(section(book.phase_rings, "phase_rings", path)?);
            note_source(&mut sources, path);
        }
        if let Some(path) = &files.intersection_book {
            let book = self.read(path, &mut warnings)?;
            assembled.intersections = Some(section(book.intersections, "intersections", path)?);
            note_source(&mut sources, path);
        }

        self.validate(assembled, sources.join(", "), warnings)
    }

    /// Runs the parse stages for `path`, consulting the cache first.
    fn read(&mut self, path: &Path, warnings: &mut Vec<LoadWarning>) -> Result<BookFile, ConfigError> {
        if let Some(book) = self.cache.get(path) {
            debug!(file = %path.display(), "book cache hit");
            return Ok(book.clone());
        }

        // Check file size limit
        let max_size = self.options.limits.max_book_size;
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {max_size} bytes"),
            });
        }

        let raw_content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(file = %path.display(), bytes = file_size, "parsing book file");
        let book = parse_book(&raw_content, path, warnings)?;
        self.cache.insert(path.to_path_buf(), book.clone());
        Ok(book)
    }

    fn validate(
        &self,
        book: BookFile,
        origin: String,
        mut warnings: Vec<LoadWarning>,
    ) -> Result<LoadResult, ConfigError> {
        let result = Validator::new().validate(&book, &self.options.limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: origin,
                errors: result.errors,
            });
        }

        warnings.extend(result.warnings.into_iter().map(|issue| LoadWarning {
            message: issue.message,
            location: Some(issue.path),
        }));

        Ok(LoadResult { book, warnings })
    }
}

// ============================================================================
// Parse stages
// ============================================================================

fn parse_book(
    raw_content: &str,
    path: &Path,
    warnings: &mut Vec<LoadWarning>,
) -> Result<BookFile, ConfigError> {
    // Handle UTF-8 BOM
    let raw_content = raw_content.strip_prefix('\u{feff}').unwrap_or(raw_content);

    let mut env_sub = EnvSubstitution::new();
    let substituted = env_sub.substitute(raw_content, path).map_err(|e| match e {
        ConfigError::ParseError { line, message, .. } => ConfigError::ParseError {
            path: path.to_path_buf(),
            line,
            message,
        },
        other => other,
    })?;
    warnings.extend(env_sub.warnings);

    let root: Value = serde_yaml::from_str(&substituted).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    if root.is_null() {
        return Err(ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: "Book file is empty".to_string(),
        });
    }

    serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: None,
        message: format!("Failed to deserialize book: {e}"),
    })
}

fn section<T>(value: Option<T>, field: &str, path: &Path) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingRequired {
        field: field.to_string(),
        location: path.display().to_string(),
    })
}

fn note_source(sources: &mut Vec<String>, path: &Path) {
    let source = path.display().to_string();
    if !sources.contains(&source) {
        sources.push(source);
    }
}

/// Expands environment variable references in raw book text.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value (empty string if unset with warning)
    /// - `${VAR:-default}` - expand to default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw_yaml: &str, source_path: &Path) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw_yaml.len());
        let mut chars = raw_yaml.chars().peekable();
        let mut line = 1usize;

        while let Some(c) = chars.next() {
            if c == '\n' {
                line += 1;
            }
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let spec = Self::parse_var_spec(&mut chars, line)?;
                    match std::env::var(&spec.name) {
                        Ok(value) => result.push_str(&value),
                        Err(_) => match spec.fallback {
                            Fallback::Default(default) => result.push_str(&default),
                            Fallback::Required(message) => {
                                return Err(ConfigError::EnvVarNotSet {
                                    var: spec.name,
                                    location: format!(
                                        "{}:{line} ({message})",
                                        source_path.display()
                                    ),
                                });
                            }
                            Fallback::Empty => self.warnings.push(LoadWarning {
                                message: format!(
                                    "Environment variable '{}' is not set, using empty string",
                                    spec.name
                                ),
                                location: Some(format!("{}:{line}", source_path.display())),
                            }),
                        },
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Parses the body of a `${...}` reference, after the opening brace.
    fn parse_var_spec(
        chars: &mut std::iter::Peekable<std::str::Chars>,
        line: usize,
    ) -> Result<VarSpec, ConfigError> {
        let mut name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => {
                    return Ok(VarSpec {
                        name,
                        fallback: Fallback::Empty,
                    });
                }
                ':' => match chars.peek() {
                    Some('-') => {
                        chars.next();
                        let default = Self::read_until_close(chars, line)?;
                        return Ok(VarSpec {
                            name,
                            fallback: Fallback::Default(default),
                        });
                    }
                    Some('?') => {
                        chars.next();
                        let message = Self::read_until_close(chars, line)?;
                        return Ok(VarSpec {
                            name,
                            fallback: Fallback::Required(message),
                        });
                    }
                    _ => name.push(':'),
                },
                _ => name.push(c),
            }
        }

        Err(unclosed(line, &format!("${{{name}")))
    }

    /// Reads content until the closing `}`, keeping nested braces.
    fn read_until_close(
        chars: &mut std::iter::Peekable<std::str::Chars>,
        line: usize,
    ) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1;

        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }

        Err(unclosed(line, &value))
    }
}

struct VarSpec {
    name: String,
    fallback: Fallback,
}

enum Fallback {
    Empty,
    Default(String),
    Required(String),
}

fn unclosed(line: usize, fragment: &str) -> ConfigError {
    ConfigError::ParseError {
        path: PathBuf::new(),
        line: Some(line),
        message: format!("Unclosed environment variable reference: {fragment}"),
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
