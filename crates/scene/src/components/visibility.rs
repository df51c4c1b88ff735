#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    pub fn visible() -> Self {
        Self { visible: true }
    }

    pub fn hidden() -> Self {
        Self { visible: false }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        Self { visible }
    }
}

#[cfg(test)]
mod tests {
    use super::Visibility;

    #[test]
    fn visibility_helpers() {
        assert!(Visibility::visible().visible);
        assert!(!Visibility::hidden().visible);
        assert_eq!(Visibility::from(false), Visibility::hidden());
    }
}
