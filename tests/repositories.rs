use folio::application::pagination::PageRequest;
use folio::application::repos::{
    CreatePageParams, CreatePostParams, MediaReferenceRepo, NavLinksRepo, NavLinksWriteRepo,
    PagesWriteRepo, PostMediaParams, PostQueryFilter, PostsRepo, PostsWriteRepo, ProfileRepo,
    RepoError, SocialLinksRepo, SocialLinksWriteRepo, TagsWriteRepo, TravelsRepo,
    UpdatePostParams,
};
use folio::domain::entities::SiteProfileRecord;
use folio::domain::navigation::{NavDestination, NavTarget};
use folio::domain::ordering::ReorderError;
use folio::domain::types::{MediaType, TravelList};
use folio::infra::db::PostgresRepositories;
use sqlx::PgPool;

fn custom(label: &str) -> NavTarget {
    NavTarget::Custom {
        label: label.to_string(),
        url: format!("https://example.com/{label}"),
    }
}

fn post(slug: &str, published: bool, tag_ids: Vec<i64>) -> CreatePostParams {
    CreatePostParams {
        slug: slug.to_string(),
        title: slug.to_uppercase(),
        content: format!("body of {slug}"),
        excerpt: None,
        published,
        tag_ids,
        media: Vec::new(),
    }
}

async fn positions(repos: &PostgresRepositories) -> Vec<(i64, i32)> {
    NavLinksRepo::list_nav_links(repos)
        .await
        .expect("list nav links")
        .iter()
        .map(|link| (link.id, link.position))
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn nav_positions_stay_dense_across_append_delete_and_reorder(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);

    let a = repos.append_nav_link(custom("a")).await.expect("a");
    let b = repos.append_nav_link(custom("b")).await.expect("b");
    let c = repos.append_nav_link(custom("c")).await.expect("c");
    assert_eq!(
        positions(&repos).await,
        [(a.id, 1), (b.id, 2), (c.id, 3)]
    );

    repos.delete_nav_link(b.id).await.expect("delete b");
    assert_eq!(positions(&repos).await, [(a.id, 1), (c.id, 2)]);

    let d = repos.append_nav_link(custom("d")).await.expect("d");
    assert_eq!(d.position, 3);

    let reordered = repos
        .reorder_nav_links(&[d.id, a.id, c.id])
        .await
        .expect("reorder");
    let order: Vec<(i64, i32)> = reordered.iter().map(|l| (l.id, l.position)).collect();
    assert_eq!(order, [(d.id, 1), (a.id, 2), (c.id, 3)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn partial_reorder_is_rejected_without_changes(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let a = repos.append_nav_link(custom("a")).await.expect("a");
    let b = repos.append_nav_link(custom("b")).await.expect("b");

    let err = repos
        .reorder_nav_links(&[b.id])
        .await
        .expect_err("subset");
    assert!(matches!(
        err,
        RepoError::Reorder(ReorderError::Missing { ref ids }) if ids == &[a.id]
    ));

    let err = repos
        .reorder_nav_links(&[b.id, a.id, a.id])
        .await
        .expect_err("duplicate");
    assert!(matches!(err, RepoError::Reorder(ReorderError::Duplicate { .. })));

    assert_eq!(positions(&repos).await, [(a.id, 1), (b.id, 2)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_missing_nav_link_is_not_found(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    assert!(matches!(
        repos.delete_nav_link(404).await,
        Err(RepoError::NotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_page_drops_its_nav_link_and_compacts(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let page = repos
        .create_page(CreatePageParams {
            slug: "about".into(),
            title: "About".into(),
            content: "hello".into(),
            published: true,
        })
        .await
        .expect("page");

    let first = repos.append_nav_link(custom("blog")).await.expect("custom");
    let linked = repos
        .append_nav_link(NavTarget::Page { page_id: page.id })
        .await
        .expect("page link");
    let last = repos.append_nav_link(custom("cv")).await.expect("custom");

    assert!(matches!(
        linked.destination,
        NavDestination::Page { ref slug, .. } if slug == "about"
    ));

    repos.delete_page(page.id).await.expect("delete page");

    assert_eq!(positions(&repos).await, [(first.id, 1), (last.id, 2)]);
    assert!(
        repos
            .find_by_page(page.id)
            .await
            .expect("find by page")
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn a_page_can_only_be_linked_once(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let page = repos
        .create_page(CreatePageParams {
            slug: "now".into(),
            title: "Now".into(),
            content: String::new(),
            published: true,
        })
        .await
        .expect("page");

    repos
        .append_nav_link(NavTarget::Page { page_id: page.id })
        .await
        .expect("first link");
    let err = repos
        .append_nav_link(NavTarget::Page { page_id: page.id })
        .await
        .expect_err("second link");
    assert!(matches!(err, RepoError::Duplicate { .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn social_links_compact_after_delete(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let gh = repos
        .append_social_link("github", "https://github.com/someone")
        .await
        .expect("github");
    let mastodon = repos
        .append_social_link("mastodon", "https://mastodon.social/@someone")
        .await
        .expect("mastodon");
    let mail = repos
        .append_social_link("email", "mailto:someone@example.com")
        .await
        .expect("email");

    repos.delete_social_link(gh.id).await.expect("delete");
    let links = repos.list_social_links().await.expect("list");
    let order: Vec<(i64, i32)> = links.iter().map(|l| (l.id, l.position)).collect();
    assert_eq!(order, [(mastodon.id, 1), (mail.id, 2)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn published_listing_paginates_newest_first_and_filters_by_tag(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let rust = repos.create_tag("Rust", "rust").await.expect("tag");

    let first = repos
        .create_post(post("first", true, vec![rust.id]))
        .await
        .expect("first");
    repos
        .create_post(post("draft", false, vec![rust.id]))
        .await
        .expect("draft");
    let second = repos
        .create_post(post("second", true, Vec::new()))
        .await
        .expect("second");
    let third = repos
        .create_post(post("third", true, vec![rust.id]))
        .await
        .expect("third");

    let request = PageRequest::new(Some(1), Some(2)).expect("page request");
    let (items, total) = repos
        .list_published(&PostQueryFilter::default(), request)
        .await
        .expect("page 1");
    assert_eq!(total, 3);
    let ids: Vec<i64> = items.iter().map(|p| p.id).collect();
    assert_eq!(ids, [third.id, second.id]);

    let request = PageRequest::new(Some(2), Some(2)).expect("page request");
    let (items, _) = repos
        .list_published(&PostQueryFilter::default(), request)
        .await
        .expect("page 2");
    let ids: Vec<i64> = items.iter().map(|p| p.id).collect();
    assert_eq!(ids, [first.id]);

    let filter = PostQueryFilter {
        tag: Some("rust".into()),
    };
    let (items, total) = repos
        .list_published(&filter, PageRequest::default())
        .await
        .expect("tagged");
    assert_eq!(total, 2);
    assert!(items.iter().all(|p| p.tags.iter().any(|t| t.slug == "rust")));

    assert!(
        repos
            .find_published_by_slug("draft")
            .await
            .expect("lookup")
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn media_references_gate_and_are_replaced_on_update(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let mut params = post("game-night", true, Vec::new());
    params.media = vec![PostMediaParams {
        media_type: MediaType::Game,
        external_id: "3498".into(),
        title: "GTA V".into(),
        background_image_url: None,
    }];
    let created = repos.create_post(params).await.expect("post");
    assert_eq!(created.media.len(), 1);
    assert_eq!(created.media[0].post_id, created.id);

    assert!(
        repos
            .is_referenced(MediaType::Game, "3498")
            .await
            .expect("lookup")
    );
    assert!(
        !repos
            .is_referenced(MediaType::Movie, "3498")
            .await
            .expect("lookup")
    );

    let updated = repos
        .update_post(UpdatePostParams {
            id: created.id,
            title: created.title.clone(),
            content: created.content.clone(),
            excerpt: None,
            published: true,
            tag_ids: None,
            media: Some(Vec::new()),
        })
        .await
        .expect("update");
    assert!(updated.media.is_empty());
    assert!(
        !repos
            .is_referenced(MediaType::Game, "3498")
            .await
            .expect("lookup")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_tag_ids_are_rejected_by_the_store(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let err = repos
        .create_post(post("orphan", true, vec![9_999]))
        .await
        .expect_err("fk");
    assert!(matches!(err, RepoError::InvalidInput { .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn iso_codes_are_unique_per_list(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    repos
        .add_country(TravelList::Visited, "Japan", 392)
        .await
        .expect("visited");
    repos
        .add_country(TravelList::Wishlist, "Japan", 392)
        .await
        .expect("wishlist is a separate list");

    let err = repos
        .add_country(TravelList::Visited, "Nippon", 392)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, RepoError::Duplicate { .. }));

    repos
        .add_country(TravelList::Visited, "Chile", 152)
        .await
        .expect("chile");
    let names: Vec<String> = repos
        .list_countries(TravelList::Visited)
        .await
        .expect("list")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Chile", "Japan"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn profile_is_a_singleton(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    assert!(repos.load_profile().await.expect("load").is_none());

    let stored = repos
        .set_photo_url("/api/uploads/profile.png")
        .await
        .expect("photo");
    assert_eq!(stored.bio, None);

    repos
        .upsert_profile(&SiteProfileRecord {
            photo_url: stored.photo_url.clone(),
            bio: Some("hello".into()),
        })
        .await
        .expect("upsert");

    let loaded = repos.load_profile().await.expect("load").expect("row");
    assert_eq!(loaded.photo_url.as_deref(), Some("/api/uploads/profile.png"));
    assert_eq!(loaded.bio.as_deref(), Some("hello"));
}
