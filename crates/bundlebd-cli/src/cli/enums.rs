use bundlebd_bundler::FormatterKind;
use clap::ValueEnum;

/// Formatter used on every produced artifact
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum FormatterChoice {
    /// The project's prettier (`npx --no-install prettier`)
    #[default]
    #[value(name = "prettier")]
    Prettier,

    /// Built-in oxc reprinter
    ///
    /// Needs no Node.js tooling. Applies the same indentation, trailing-comma
    /// and line-ending options but does not re-wrap lines.
    #[value(name = "layout")]
    Layout,
}

impl From<FormatterChoice> for FormatterKind {
    fn from(choice: FormatterChoice) -> Self {
        match choice {
            FormatterChoice::Prettier => FormatterKind::Prettier,
            FormatterChoice::Layout => FormatterKind::Layout,
        }
    }
}
