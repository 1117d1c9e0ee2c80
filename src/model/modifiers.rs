//! Declaration modifiers.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifier keywords on a class or member declaration.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const ABSTRACT = 1 << 4;
        const FINAL = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;
        const SEALED = 1 << 12;
        const NON_SEALED = 1 << 13;
    }
}

const KEYWORDS: &[(Modifiers, &str)] = &[
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::DEFAULT, "default"),
    (Modifiers::STATIC, "static"),
    (Modifiers::SEALED, "sealed"),
    (Modifiers::NON_SEALED, "non-sealed"),
    (Modifiers::FINAL, "final"),
    (Modifiers::TRANSIENT, "transient"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::SYNCHRONIZED, "synchronized"),
    (Modifiers::NATIVE, "native"),
    (Modifiers::STRICTFP, "strictfp"),
];

impl Modifiers {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(_, text)| *text == keyword)
            .map(|(flag, _)| *flag)
    }

    /// Collect keywords; unknown words are ignored.
    pub fn from_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keywords
            .into_iter()
            .filter_map(|k| Self::from_keyword(k.as_ref()))
            .fold(Self::empty(), |acc, flag| acc | flag)
    }

    /// Keywords in conventional declaration order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        KEYWORDS
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, text)| *text)
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, keyword) in self.keywords().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_keywords() {
        let mods = Modifiers::from_keywords(["static", "public", "final", "bogus"]);
        assert_eq!(mods, Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
        assert!(mods.is_static());
    }

    #[test]
    fn test_display_uses_conventional_order() {
        let mods = Modifiers::from_keywords(["final", "static", "private"]);
        assert_eq!(mods.to_string(), "private static final");
        assert_eq!(Modifiers::NON_SEALED.to_string(), "non-sealed");
        assert_eq!(Modifiers::empty().to_string(), "");
    }
}
