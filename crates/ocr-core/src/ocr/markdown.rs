use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static IMAGE_LINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").ok());

const IMAGE_DIR_PREFIX: &str = "images/";

/// Point relative Markdown image links at the exported `images/` directory.
///
/// Links that already start with `images/`, `http` or `/` are left alone.
pub fn rewrite_image_links(markdown: &str) -> Cow<'_, str> {
    let Some(pattern) = IMAGE_LINK.as_ref() else {
        return Cow::Borrowed(markdown);
    };
    pattern.replace_all(markdown, |caps: &Captures<'_>| {
        let alt = &caps[1];
        let src = &caps[2];
        if src.starts_with(IMAGE_DIR_PREFIX) || src.starts_with("http") || src.starts_with('/') {
            caps[0].to_string()
        } else {
            format!("![{alt}]({IMAGE_DIR_PREFIX}{src})")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_links_gain_images_prefix() {
        assert_eq!(
            rewrite_image_links("see ![fig 1](img-0.jpeg) here"),
            "see ![fig 1](images/img-0.jpeg) here"
        );
    }

    #[test]
    fn absolute_and_prefixed_links_are_untouched() {
        let text = "![a](images/x.png) ![b](https://e.com/y.png) ![c](/abs/z.png)";
        assert_eq!(rewrite_image_links(text), text);
    }

    #[test]
    fn text_without_links_is_borrowed() {
        assert!(matches!(rewrite_image_links("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn several_links_are_rewritten() {
        assert_eq!(
            rewrite_image_links("![](a.png)\n![](b.png)"),
            "![](images/a.png)\n![](images/b.png)"
        );
    }
}
