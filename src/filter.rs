//! Filtering and normalization of the raw remote listing.
//!
//! Selects listing entries containing an `@eaDir` path segment, truncates
//! each to end right after that segment, deduplicates, sorts, and prefixes
//! the remote base path. Segment matching is structural (exact comparison of
//! split segments), not substring or pattern matching: `foo/eaDirectory/bar`
//! and `foo/x@eaDir/y` never match, `foo/@eaDir/thumbs/1.jpg` reduces to
//! `foo/@eaDir`.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::debug;

use crate::types::{EA_DIR_SEGMENT, EaDirPath, RemoteTarget};

/// Truncate a listing entry at the end of its first `@eaDir` segment.
///
/// Returns `None` when the entry has no such segment, the common case.
/// The segment must be delimited by `/` or begin/end-of-string on both
/// sides.
pub fn truncate_at_eadir(entry: &str) -> Option<&str> {
    let mut offset = 0;
    for segment in entry.split('/') {
        let end = offset + segment.len();
        if segment == EA_DIR_SEGMENT {
            return Some(&entry[..end]);
        }
        offset = end + 1;
    }
    None
}

/// Produce the queue content from a raw listing.
///
/// Matching entries are truncated to their top-level `@eaDir` directory,
/// deduplicated, sorted ascending (deterministic resumable ordering), and
/// made absolute against the target's base path. Queuing only the top-level
/// directory is deliberate: one recursive removal of the parent covers
/// everything nested inside it, so no queued path is ever a descendant of
/// another.
pub fn normalize_listing<I, S>(entries: I, target: &RemoteTarget) -> Result<Vec<EaDirPath>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let base = target.base_path_trimmed();

    let relative: BTreeSet<String> = entries
        .into_iter()
        .filter_map(|entry| truncate_at_eadir(entry.as_ref()).map(str::to_string))
        .collect();

    let mut queue = Vec::with_capacity(relative.len());
    for rel in relative {
        let absolute = if base == "/" {
            format!("/{rel}")
        } else {
            format!("{base}/{rel}")
        };
        queue.push(EaDirPath::new(absolute)?);
    }

    debug!(matched = queue.len(), "listing normalization completed.");
    Ok(queue)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils::init_dummy_tracing_subscriber;

    fn target(base: &str) -> RemoteTarget {
        RemoteTarget::new("nas", base)
    }

    fn paths(queue: &[EaDirPath]) -> Vec<&str> {
        queue.iter().map(|p| p.as_str()).collect()
    }

    #[test]
    fn truncates_after_first_eadir_segment() {
        init_dummy_tracing_subscriber();

        assert_eq!(
            truncate_at_eadir("music/@eaDir/SYNOPHOTO_THUMB.jpg"),
            Some("music/@eaDir")
        );
        assert_eq!(truncate_at_eadir("music/@eaDir/"), Some("music/@eaDir"));
        assert_eq!(truncate_at_eadir("@eaDir"), Some("@eaDir"));
        assert_eq!(truncate_at_eadir("@eaDir/nested/deep"), Some("@eaDir"));
    }

    #[test]
    fn substring_matches_are_rejected() {
        init_dummy_tracing_subscriber();

        assert_eq!(truncate_at_eadir("foo/eaDirectory/bar"), None);
        assert_eq!(truncate_at_eadir("foo/x@eaDir/y"), None);
        assert_eq!(truncate_at_eadir("foo/@eaDirs/y"), None);
        assert_eq!(truncate_at_eadir("music/a.flac"), None);
    }

    #[test]
    fn end_to_end_scenario_from_mixed_listing() {
        init_dummy_tracing_subscriber();

        // Raw listing with matches at two depths plus noise.
        let listing = [
            "music/a.flac",
            "music/@eaDir/SYNOPHOTO_THUMB.jpg",
            "music/rock/@eaDir/x",
            "music/rock/@eaDir/y/z",
        ];
        let queue = normalize_listing(listing, &target("/data")).unwrap();
        assert_eq!(
            paths(&queue),
            vec!["/data/music/@eaDir", "/data/music/rock/@eaDir"]
        );
    }

    #[test]
    fn deduplicates_entries_under_one_eadir() {
        init_dummy_tracing_subscriber();

        let listing = [
            "photo/@eaDir/a.jpg",
            "photo/@eaDir/b.jpg",
            "photo/@eaDir/",
            "photo/@eaDir/deep/nested/c.jpg",
        ];
        let queue = normalize_listing(listing, &target("/volume1")).unwrap();
        assert_eq!(paths(&queue), vec!["/volume1/photo/@eaDir"]);
    }

    #[test]
    fn sorts_lexicographically() {
        init_dummy_tracing_subscriber();

        let listing = ["z/@eaDir/x", "a/@eaDir/y", "m/@eaDir"];
        let queue = normalize_listing(listing, &target("/d")).unwrap();
        assert_eq!(
            paths(&queue),
            vec!["/d/a/@eaDir", "/d/m/@eaDir", "/d/z/@eaDir"]
        );
    }

    #[test]
    fn non_matching_listing_yields_empty_queue() {
        init_dummy_tracing_subscriber();

        let listing = ["music/a.flac", "music/b.flac"];
        let queue = normalize_listing(listing, &target("/data")).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn bare_eadir_entry_is_a_normal_match() {
        init_dummy_tracing_subscriber();

        // Base path itself named @eaDir: the segment-boundary rule needs no
        // special case.
        let queue = normalize_listing(["@eaDir"], &target("/data")).unwrap();
        assert_eq!(paths(&queue), vec!["/data/@eaDir"]);
    }

    #[test]
    fn base_path_trailing_separator_does_not_double_slash() {
        init_dummy_tracing_subscriber();

        let queue = normalize_listing(["x/@eaDir"], &target("/data/")).unwrap();
        assert_eq!(paths(&queue), vec!["/data/x/@eaDir"]);
    }

    #[test]
    fn root_base_path() {
        init_dummy_tracing_subscriber();

        let queue = normalize_listing(["x/@eaDir"], &target("/")).unwrap();
        assert_eq!(paths(&queue), vec!["/x/@eaDir"]);
    }

    #[test]
    fn nested_eadir_inside_eadir_truncates_at_first() {
        init_dummy_tracing_subscriber();

        let queue = normalize_listing(["a/@eaDir/@eaDir/x"], &target("/d")).unwrap();
        assert_eq!(paths(&queue), vec!["/d/a/@eaDir"]);
    }
}
