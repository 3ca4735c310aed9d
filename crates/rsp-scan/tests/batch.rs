mod common;

use common::*;
use rsp_core::error::RepoError;
use rsp_core::repo::NodeLookup;
use rsp_core::tree::ContentTree;
use rsp_scan::batch::*;
use rsp_scan::classify::Category;

fn roots(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

fn paths(nodes: &[rsp_core::node::ContentNode]) -> Vec<String> {
    nodes.iter().map(|n| n.path().to_string()).collect()
}

#[test]
fn test_find_candidates_root_by_root() {
    let tree = site();
    let found: Vec<String> = find_candidates(&tree, &roots(&["/conf", "/content/we/en/about"]))
        .map(|r| r.unwrap().path().to_string())
        .collect();
    assert_eq!(
        found,
        vec![
            responsive(&format!("{}/title", STRUCTURE_ROOT)),
            responsive(&format!("{}/footer", STRUCTURE_ROOT)),
            responsive(&format!("{}/title", INITIAL_ROOT)),
            responsive(&format!("{}/title", ABOUT_ROOT)),
        ]
    );
}

#[test]
fn test_repository_root_is_never_searched() {
    let tree = site();
    assert_eq!(find_candidates(&tree, &roots(&["/"])).count(), 0);
    assert_eq!(find_candidates(&tree, &roots(&["///"])).count(), 0);
    assert!(!is_searchable_root(&tree, "/"));
}

#[test]
fn test_empty_and_missing_roots_are_skipped() {
    let tree = site();
    let found = find_candidates(&tree, &roots(&["", "/nowhere", "relative", "/content/we/legacy/"]))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(paths(&found), vec![responsive(&format!("{}/title", LEGACY_ROOT))]);
}

#[test]
fn test_candidates_are_lazy() {
    let tree = site();
    let mut cursor = find_candidates(&tree, &roots(&["/content", "/conf"]));
    let first = cursor.next().unwrap().unwrap();
    assert_eq!(first.path(), responsive(&format!("{}/title", EN_ROOT)));
    assert_eq!(cursor.count(), 8);
}

#[test]
fn test_filter_by_category() {
    let tree = site();
    let candidates: Vec<_> = find_candidates(&tree, &roots(&["/content", "/conf"]))
        .map(Result::unwrap)
        .collect();

    let shadows: Vec<_> =
        filter_by_category(&tree, candidates.clone(), Some(Category::Shadow)).collect();
    assert_eq!(
        paths(&shadows),
        vec![
            responsive(&format!("{}/title", EN_ROOT)),
            responsive(&format!("{}/image", EN_ROOT)),
            responsive(&format!("{}/title", ABOUT_ROOT)),
            responsive(&format!("{}/title", INITIAL_ROOT)),
        ]
    );

    let orphans: Vec<_> =
        filter_by_category(&tree, candidates.clone(), Some(Category::Orphan)).collect();
    assert_eq!(paths(&orphans), vec![responsive(&format!("{}/image", EN_ROOT))]);

    let initial: Vec<_> = filter_by_category(
        &tree,
        candidates.clone(),
        Some(Category::ShadowInTemplateInitial),
    )
    .collect();
    assert_eq!(paths(&initial), vec![responsive(&format!("{}/title", INITIAL_ROOT))]);

    let in_content =
        filter_by_category(&tree, candidates, Some(Category::ShadowInContent)).count();
    assert_eq!(in_content, 3);
}

#[test]
fn test_unknown_category_matches_nothing() {
    let tree = site();
    let matches = collect_matches(&tree, &roots(&["/content", "/conf"]), None).unwrap();
    assert!(matches.is_empty());
}

#[test]
fn test_non_responsive_candidates_are_dropped() {
    let tree = site();
    let stray = tree.node(EN_ROOT).unwrap();
    let kept = filter_by_category(&tree, vec![stray], Some(Category::Shadow)).count();
    assert_eq!(kept, 0);
}

#[test]
fn test_deletion_guard_is_strictly_greater() {
    assert!(!deletion_allowed(0, 1));
    assert!(!deletion_allowed(1, 1));
    assert!(deletion_allowed(2, 1));
    assert!(deletion_allowed(1, 0));
}

#[test]
fn test_delete_all_removes_only_targets() {
    let mut tree = site();
    let matches =
        collect_matches(&tree, &roots(&["/content"]), Some(Category::ShadowInContent)).unwrap();
    let before = tree.len();

    let outcomes = delete_all(&mut tree, &matches);
    assert!(outcomes.iter().all(DeletionOutcome::is_success));

    for path in paths(&matches) {
        assert!(!tree.contains(&path));
        assert!(!tree.contains(&format!("{}/default", path)));
    }
    // Each deleted node took its one breakpoint child with it.
    assert_eq!(tree.len(), before - 6);
    assert!(tree.contains(&format!("{}/title", EN_ROOT)));
    assert!(tree.contains(&responsive(&format!("{}/footer", EN_ROOT))));
    assert_eq!(tree.pending_changes(), 0);
}

#[test]
fn test_delete_all_survives_a_failure() {
    let tree = site();
    let matches =
        collect_matches(&tree, &roots(&["/content"]), Some(Category::ShadowInContent)).unwrap();
    assert_eq!(matches.len(), 3);
    let second = matches[1].path().to_string();

    let mut repo = FailingRepo::new(tree, &[&second]);
    let outcomes = delete_all(&mut repo, &matches);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_success());
    assert!(matches!(outcomes[1].result, Err(RepoError::Persistence(_))));
    assert_eq!(outcomes[1].path, second);
    assert!(outcomes[2].is_success());

    assert!(!repo.inner.contains(matches[0].path()));
    assert!(repo.inner.contains(&second));
    assert!(!repo.inner.contains(matches[2].path()));
    // One commit per successful delete.
    assert_eq!(repo.commits, 2);
}

#[test]
fn test_deleting_an_already_removed_node_is_recorded() {
    let mut tree = ContentTree::new();
    tree.add_node("/content/a/cq:responsive/cq:responsive", "nt:unstructured")
        .unwrap();
    let outer = tree.node("/content/a/cq:responsive").unwrap();
    let inner = tree.node("/content/a/cq:responsive/cq:responsive").unwrap();

    let outcomes = delete_all(&mut tree, &[outer, inner]);
    assert!(outcomes[0].is_success());
    assert!(matches!(outcomes[1].result, Err(RepoError::NotFound(_))));
}

#[test]
fn test_failed_commit_puts_the_node_back() {
    let tree = site();
    let matches =
        collect_matches(&tree, &roots(&["/content"]), Some(Category::ShadowInContent)).unwrap();
    let second = matches[1].path().to_string();

    let mut repo = FailingRepo::with_failing_commits(tree, &[&second]);
    let outcomes = delete_all(&mut repo, &matches);

    assert!(outcomes[0].is_success());
    assert!(matches!(outcomes[1].result, Err(RepoError::Persistence(_))));
    assert!(outcomes[2].is_success());
    assert_eq!(repo.reverts, 1);

    // The failed node and its breakpoint are back; the third delete did not
    // carry the second one with it.
    assert!(repo.inner.contains(&second));
    assert!(repo.inner.contains(&format!("{}/default", second)));
    assert!(!repo.inner.contains(matches[0].path()));
    assert!(!repo.inner.contains(matches[2].path()));
    assert_eq!(repo.inner.pending_changes(), 0);
}
