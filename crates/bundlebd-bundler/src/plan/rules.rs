//! Per-file-type module rules.
//!
//! Rules are declarative: a resource pattern, optional conditions on the
//! resource query and on the importing module, and either a chain of loader
//! steps or an asset type. [`ModuleRule::matches`] evaluates the conditions
//! the same way the toolchain would.

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::Result;

/// Syntax level every transpile step lowers to.
pub const ES_TARGET: &str = "es2018";

/// Importers that count as code modules.
const CODE_ISSUER: &str = r"\.[jt]sx?$";

/// A compiled regular expression that compares and serializes as its source.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Condition on an optional value (a resource query or an importer path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// The value is present and matches.
    Match(Pattern),
    /// The value is absent or does not match.
    Not(Pattern),
}

impl Condition {
    pub fn evaluate(&self, value: Option<&str>) -> bool {
        match self {
            Self::Match(pattern) => value.is_some_and(|v| pattern.is_match(v)),
            Self::Not(pattern) => !value.is_some_and(|v| pattern.is_match(v)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    Jsx,
    Tsx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Contents exported as a string.
    Source,
    /// Contents inlined as a data URL.
    Inline,
}

/// CSS module scoping for one style rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssModules {
    /// Only resources matching this pattern are scoped. `None` scopes all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto: Option<Pattern>,
    pub local_ident_name: String,
}

impl CssModules {
    /// Whether class names in `resource` get rewritten to local identifiers.
    pub fn is_scoped(&self, resource: &str) -> bool {
        self.auto
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(resource))
    }
}

/// One step of a loader chain. Chains are listed the way the toolchain takes
/// them: the last step runs first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "loader", rename_all = "camelCase")]
pub enum LoaderStep {
    Transpile {
        syntax: Syntax,
        target: String,
    },
    /// Injects the compiled stylesheet into the host document at runtime.
    StyleInject,
    #[serde(rename_all = "camelCase")]
    Css {
        modules: CssModules,
        /// Number of preprocessors running before the CSS step.
        import_loaders: usize,
    },
    Sass,
    #[serde(rename_all = "camelCase")]
    SvgComponent {
        jsx_runtime: String,
        babel: bool,
    },
}

impl LoaderStep {
    pub fn transpile(syntax: Syntax) -> Self {
        Self::Transpile {
            syntax,
            target: ES_TARGET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleAction {
    Use { steps: Vec<LoaderStep> },
    Asset { asset: AssetType },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRule {
    pub test: Pattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_query: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Condition>,
    #[serde(flatten)]
    pub action: RuleAction,
}

impl ModuleRule {
    fn new(test: &str, action: RuleAction) -> Result<Self> {
        Ok(Self {
            test: Pattern::new(test)?,
            resource_query: None,
            issuer: None,
            action,
        })
    }

    fn with_query(mut self, condition: Condition) -> Self {
        self.resource_query = Some(condition);
        self
    }

    fn with_issuer(mut self, condition: Condition) -> Self {
        self.issuer = Some(condition);
        self
    }

    /// Whether this rule applies to `resource` imported with `query` (such as
    /// `?module`) from `issuer`.
    pub fn matches(&self, resource: &str, query: Option<&str>, issuer: Option<&str>) -> bool {
        self.test.is_match(resource)
            && self
                .resource_query
                .as_ref()
                .is_none_or(|condition| condition.evaluate(query))
            && self
                .issuer
                .as_ref()
                .is_none_or(|condition| condition.evaluate(issuer))
    }

    pub fn steps(&self) -> &[LoaderStep] {
        match &self.action {
            RuleAction::Use { steps } => steps,
            RuleAction::Asset { .. } => &[],
        }
    }

    pub fn asset_type(&self) -> Option<AssetType> {
        match &self.action {
            RuleAction::Asset { asset } => Some(*asset),
            RuleAction::Use { .. } => None,
        }
    }

    /// CSS module settings of the rule's CSS step, if it has one.
    pub fn css_modules(&self) -> Option<&CssModules> {
        self.steps().iter().find_map(|step| match step {
            LoaderStep::Css { modules, .. } => Some(modules),
            _ => None,
        })
    }
}

fn use_steps(steps: Vec<LoaderStep>) -> RuleAction {
    RuleAction::Use { steps }
}

fn asset(asset: AssetType) -> RuleAction {
    RuleAction::Asset { asset }
}

/// Transpile rules for JavaScript and TypeScript sources.
pub fn compile_rules() -> Result<Vec<ModuleRule>> {
    Ok(vec![
        ModuleRule::new(r"\.jsx?$", use_steps(vec![LoaderStep::transpile(Syntax::Jsx)]))?,
        ModuleRule::new(r"\.tsx?$", use_steps(vec![LoaderStep::transpile(Syntax::Tsx)]))?,
    ])
}

/// The rule pair for one style extension group.
///
/// The first rule handles plain imports: files named `*.module.<ext>` are
/// scoped, everything else keeps global class names. The second handles
/// imports carrying a `module` query and always scopes. Preprocessors run
/// before the CSS step and are counted in its `importLoaders`.
pub fn style_rules(
    extension: &str,
    preprocessors: &[LoaderStep],
    plugin_name: &str,
) -> Result<Vec<ModuleRule>> {
    let local_ident_name = format!("{}-[name]-[local]", plugin_name);
    let chain = |modules: CssModules| {
        let mut steps = vec![
            LoaderStep::StyleInject,
            LoaderStep::Css {
                modules,
                import_loaders: preprocessors.len(),
            },
        ];
        steps.extend(preprocessors.iter().cloned());
        use_steps(steps)
    };

    let auto_detect = CssModules {
        auto: Some(Pattern::new(&format!(r"\.module{}", extension))?),
        local_ident_name: local_ident_name.clone(),
    };
    let always_scoped = CssModules {
        auto: None,
        local_ident_name,
    };

    Ok(vec![
        ModuleRule::new(extension, chain(auto_detect))?
            .with_query(Condition::Not(Pattern::new("module")?)),
        ModuleRule::new(extension, chain(always_scoped))?
            .with_query(Condition::Match(Pattern::new("module")?)),
    ])
}

/// Text, image and SVG handling.
pub fn asset_rules() -> Result<Vec<ModuleRule>> {
    let svg_component = use_steps(vec![
        LoaderStep::transpile(Syntax::Jsx),
        LoaderStep::SvgComponent {
            jsx_runtime: "automatic".to_string(),
            babel: false,
        },
    ]);

    Ok(vec![
        ModuleRule::new(r"\.txt$", asset(AssetType::Source))?,
        ModuleRule::new(r"\.svg$", svg_component)?
            .with_issuer(Condition::Match(Pattern::new(CODE_ISSUER)?))
            .with_query(Condition::Not(Pattern::new("url")?)),
        ModuleRule::new(r"\.svg$", asset(AssetType::Inline))?
            .with_issuer(Condition::Match(Pattern::new(CODE_ISSUER)?))
            .with_query(Condition::Match(Pattern::new("url")?)),
        ModuleRule::new(r"\.svg$", asset(AssetType::Inline))?
            .with_issuer(Condition::Not(Pattern::new(CODE_ISSUER)?)),
        ModuleRule::new(r"\.png$|\.jpe?g$", asset(AssetType::Inline))?,
    ])
}

/// Every rule of a plugin build, in evaluation order.
pub fn module_rules(plugin_name: &str) -> Result<Vec<ModuleRule>> {
    let mut rules = compile_rules()?;
    rules.extend(style_rules(r"\.css$", &[], plugin_name)?);
    rules.extend(style_rules(r"\.s[ac]ss$", &[LoaderStep::Sass], plugin_name)?);
    rules.extend(asset_rules()?);
    Ok(rules)
}
