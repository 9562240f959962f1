//! Image diff resolver

use shared::models::{ImageDiff, ImageSource};
use std::collections::HashSet;

/// Split an editable image list for an edit call
///
/// `existing` keeps the list's references in order, minus anything in
/// `to_remove`. Removal wins over retention. Only references the entity
/// actually holds are reported as removed; duplicates collapse.
pub fn partition_images(images: &[ImageSource], to_remove: &[String]) -> ImageDiff {
    let removal: HashSet<&str> = to_remove.iter().map(String::as_str).collect();

    let mut diff = ImageDiff::default();
    let mut seen = HashSet::new();
    for image in images {
        match image {
            ImageSource::Reference(locator) => {
                if removal.contains(locator.as_str()) {
                    continue;
                }
                if seen.insert(locator.as_str()) {
                    diff.existing.push(locator.clone());
                }
            }
            ImageSource::Payload(payload) => diff.pending.push(payload.clone()),
        }
    }

    let mut removed_seen = HashSet::new();
    diff.removed = to_remove
        .iter()
        .filter(|r| removed_seen.insert(r.as_str()))
        .cloned()
        .collect();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::FilePayload;

    fn refs(names: &[&str]) -> Vec<ImageSource> {
        names.iter().map(|n| ImageSource::reference(*n)).collect()
    }

    #[test]
    fn test_partition_mixed_list() {
        let mut images = refs(&["a.jpg", "b.jpg"]);
        images.push(FilePayload::new("new1.png", vec![1]).into());
        images.extend(refs(&["c.jpg"]));
        images.push(FilePayload::new("new2.png", vec![2]).into());

        let diff = partition_images(&images, &["b.jpg".to_string()]);
        assert_eq!(diff.existing, vec!["a.jpg", "c.jpg"]);
        assert_eq!(diff.pending.len(), 2);
        assert_eq!(diff.pending[0].file_name, "new1.png");
        assert_eq!(diff.pending[1].file_name, "new2.png");
        assert_eq!(diff.removed, vec!["b.jpg"]);
    }

    #[test]
    fn test_removal_takes_precedence() {
        let images = refs(&["a.jpg", "b.jpg", "c.jpg"]);
        let removal = vec!["a.jpg".to_string(), "c.jpg".to_string(), "a.jpg".to_string()];
        let diff = partition_images(&images, &removal);

        assert_eq!(diff.existing, vec!["b.jpg"]);
        assert_eq!(diff.removed, vec!["a.jpg", "c.jpg"]);
        assert!(diff.existing.iter().all(|e| !diff.removed.contains(e)));
    }

    #[test]
    fn test_every_removal_subset() {
        // k references, m payloads, every subset R of references
        let names = ["r0", "r1", "r2", "r3"];
        let mut images = refs(&names);
        images.insert(1, FilePayload::new("p0.png", vec![0]).into());
        images.push(FilePayload::new("p1.png", vec![1]).into());

        for mask in 0u32..(1 << names.len()) {
            let removal: Vec<String> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, n)| n.to_string())
                .collect();
            let diff = partition_images(&images, &removal);

            let expected: Vec<String> = names
                .iter()
                .filter(|n| !removal.iter().any(|r| r == *n))
                .map(|n| n.to_string())
                .collect();
            assert_eq!(diff.existing, expected);
            assert_eq!(diff.pending.len(), 2);
            assert!(diff.existing.iter().all(|e| !diff.removed.contains(e)));
        }
    }

    #[test]
    fn test_unchanged() {
        let diff = partition_images(&refs(&["a.jpg"]), &[]);
        assert!(diff.is_unchanged());
    }
}
