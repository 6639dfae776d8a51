// src/resolve.rs

//! Inline image placeholder resolution.
//!
//! Content bodies mark image insertion points with the literal token
//! `<--image-->`. Resolution pairs the Nth placeholder (document order)
//! with the image of sort_order rank N: images are stable-sorted by
//! `sort_order`, so equal ranks keep their fetch order. Unmatched trailing
//! placeholders stay literal; unmatched trailing images are unused.
//!
//! Resolution must always start from the original stored body. A resolved
//! body has no placeholders left, so feeding it back in returns it
//! unchanged rather than re-pairing anything.

use crate::models::ContentImage;

/// Literal token marking an image insertion point.
pub const IMAGE_PLACEHOLDER: &str = "<--image-->";

/// Count placeholder tokens in a body.
pub fn placeholder_count(body: &str) -> usize {
    body.matches(IMAGE_PLACEHOLDER).count()
}

/// Markdown rendering of one image: `![alt](url "WIDTHxHEIGHT")` when both
/// dimensions are known, `![alt](url)` otherwise.
pub fn image_markdown(image: &ContentImage) -> String {
    let alt = image.alt.as_deref().unwrap_or("Image");
    match (image.width, image.height) {
        (Some(w), Some(h)) => format!("![{alt}]({} \"{w}x{h}\")", image.url),
        _ => format!("![{alt}]({})", image.url),
    }
}

/// Replace placeholders with images in pairing order.
///
/// Pure in `(body, images)`: resolving the same unresolved body twice yields
/// identical output. Produces `min(placeholders, images)` substitutions.
pub fn resolve_placeholders(body: &str, images: &[ContentImage]) -> String {
    if images.is_empty() || !body.contains(IMAGE_PLACEHOLDER) {
        return body.to_string();
    }

    let mut ordered: Vec<&ContentImage> = images.iter().collect();
    // Stable: ties on sort_order keep fetch order.
    ordered.sort_by_key(|image| image.sort_order);

    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    let mut next_image = ordered.into_iter();

    while let Some(pos) = rest.find(IMAGE_PLACEHOLDER) {
        let Some(image) = next_image.next() else {
            break;
        };
        out.push_str(&rest[..pos]);
        out.push_str(&image_markdown(image));
        rest = &rest[pos + IMAGE_PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, url: &str, sort_order: i32) -> ContentImage {
        ContentImage {
            id: id.into(),
            content_id: "c1".into(),
            url: url.into(),
            alt: None,
            sort_order,
            width: None,
            height: None,
            created_at: "2025-01-01T00:00:00".into(),
            updated_at: "2025-01-01T00:00:00".into(),
        }
    }

    #[test]
    fn test_pairs_placeholders_in_order() {
        let body = "A <--image--> B <--image--> C";
        let images = vec![image("i1", "x", 0), image("i2", "y", 1)];
        assert_eq!(
            resolve_placeholders(body, &images),
            "A ![Image](x) B ![Image](y) C"
        );
    }

    #[test]
    fn test_excess_placeholders_stay_literal() {
        let body = "<--image--> mid <--image-->";
        let images = vec![image("i1", "x", 0)];
        assert_eq!(
            resolve_placeholders(body, &images),
            "![Image](x) mid <--image-->"
        );
    }

    #[test]
    fn test_excess_images_are_unused() {
        let body = "only <--image--> here";
        let images = vec![image("i1", "x", 0), image("i2", "y", 1)];
        let resolved = resolve_placeholders(body, &images);
        assert_eq!(resolved, "only ![Image](x) here");
        assert!(!resolved.contains("y"));
    }

    #[test]
    fn test_sorts_by_sort_order_not_fetch_order() {
        let body = "<--image--> <--image-->";
        let images = vec![image("i2", "second", 5), image("i1", "first", 1)];
        assert_eq!(
            resolve_placeholders(body, &images),
            "![Image](first) ![Image](second)"
        );
    }

    #[test]
    fn test_equal_sort_order_keeps_fetch_order() {
        // Tie-break assumption: stable sort preserves the fetched ordering.
        let body = "<--image--> <--image-->";
        let images = vec![image("i1", "a", 3), image("i2", "b", 3)];
        assert_eq!(
            resolve_placeholders(body, &images),
            "![Image](a) ![Image](b)"
        );
    }

    #[test]
    fn test_dimensioned_image_markdown() {
        let mut img = image("i1", "https://cdn/pic.png", 0);
        img.alt = Some("diagram".into());
        img.width = Some(640);
        img.height = Some(480);
        assert_eq!(
            image_markdown(&img),
            "![diagram](https://cdn/pic.png \"640x480\")"
        );

        // One missing dimension drops the size hint entirely.
        img.height = None;
        assert_eq!(image_markdown(&img), "![diagram](https://cdn/pic.png)");
    }

    #[test]
    fn test_resolving_same_source_twice_is_identical() {
        let body = "intro <--image--> outro";
        let images = vec![image("i1", "x", 0)];
        let first = resolve_placeholders(body, &images);
        let second = resolve_placeholders(body, &images);
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolved_body_passes_through_unchanged() {
        let body = "intro <--image--> outro";
        let images = vec![image("i1", "x", 0)];
        let resolved = resolve_placeholders(body, &images);
        // No placeholders remain, so nothing can be re-paired.
        assert_eq!(resolve_placeholders(&resolved, &images), resolved);
    }

    #[test]
    fn test_no_images_returns_body() {
        let body = "keep <--image--> literal";
        assert_eq!(resolve_placeholders(body, &[]), body);
    }

    #[test]
    fn test_placeholder_count() {
        assert_eq!(placeholder_count("none"), 0);
        assert_eq!(placeholder_count("<--image--><--image-->"), 2);
    }
}
