//! Repository tests against a real database. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::Utc;
use sqlx::PgPool;
use zenith_portfolio::{
    db::postgres::{create_pool, run_migrations},
    entities::{
        comment::CommentForm,
        education::{Education, EducationForm},
        post::PostForm,
        skill::{Skill, SkillForm, SkillType},
        user::UserInsert,
    },
    errors::AppError,
    repositories::{
        comment::CommentRepository, cv::CvRepository, post::PostRepository, user::UserRepository,
    },
    shared_repos::SharedRepositories,
};

async fn repositories() -> SharedRepositories {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool: PgPool = create_pool(&url).await.expect("Failed to connect to Postgres");
    run_migrations(&pool).await.expect("Failed to run migrations");
    SharedRepositories::postgres(pool)
}

/// Rows are never truncated; every test works on its own uniquely named data.
fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn author(repos: &SharedRepositories) -> i64 {
    repos
        .users
        .create_user(&UserInsert {
            username: unique("author"),
            password_hash: "not-a-real-hash".to_string(),
            created_at: Utc::now(),
        })
        .await
        .expect("Failed to insert user")
}

fn post_form(title: &str) -> PostForm {
    PostForm {
        title: title.to_string(),
        subtitle: "Subtitle".to_string(),
        text: "Some *markdown*".to_string(),
    }
}

fn comment_form(text: &str) -> CommentForm {
    CommentForm { author: "Sam".to_string(), text: text.to_string() }
}

#[actix_rt::test]
#[ignore = "needs DATABASE_URL"]
async fn listings_split_drafts_and_count_approved_comments() {
    let repos = repositories().await;
    let author_id = author(&repos).await;

    let published = repos.posts.create_post(&post_form("Published").prepare_for_insert(author_id)).await.unwrap();
    repos.posts.publish_post(published.id, Utc::now()).await.unwrap();
    let draft = repos.posts.create_post(&post_form("Draft").prepare_for_insert(author_id)).await.unwrap();

    let approved = repos.comments.create_comment(&comment_form("Great").prepare_for_insert(published.id)).await.unwrap();
    repos.comments.approve_comment(approved.id).await.unwrap();
    repos.comments.create_comment(&comment_form("Spam").prepare_for_insert(published.id)).await.unwrap();
    repos.comments.create_comment(&comment_form("Pending").prepare_for_insert(draft.id)).await.unwrap();

    let listed: Vec<_> = repos
        .posts
        .list_published()
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.post.author_id == author_id)
        .collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].post.id, published.id);
    assert!(listed[0].post.published_date.is_some());
    assert_eq!(listed[0].approved_comments, 1);

    let drafts: Vec<_> = repos
        .posts
        .list_drafts()
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.post.author_id == author_id)
        .collect();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].post.id, draft.id);
    assert_eq!(drafts[0].approved_comments, 0);

    let visible = repos.comments.list_for_post(published.id, true).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, approved.id);
    assert_eq!(repos.comments.list_for_post(published.id, false).await.unwrap().len(), 2);
}

#[actix_rt::test]
#[ignore = "needs DATABASE_URL"]
async fn deleting_a_post_removes_its_comments() {
    let repos = repositories().await;
    let author_id = author(&repos).await;

    let post = repos.posts.create_post(&post_form("Doomed").prepare_for_insert(author_id)).await.unwrap();
    let comment = repos.comments.create_comment(&comment_form("Bye").prepare_for_insert(post.id)).await.unwrap();

    repos.posts.delete_post(post.id).await.unwrap();

    assert!(repos.posts.get_post_by_id(post.id).await.unwrap().is_none());
    assert!(repos.comments.get_comment_by_id(comment.id).await.unwrap().is_none());
    assert!(matches!(repos.posts.delete_post(post.id).await, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
#[ignore = "needs DATABASE_URL"]
async fn cv_records_are_written_by_form_fields() {
    let repos = repositories().await;
    let education: &dyn CvRepository<Education> = repos.cv.education.as_ref();

    let form = EducationForm {
        title: unique("University"),
        location: "York".to_string(),
        start_date: "2017".to_string(),
        end_date: "2020".to_string(),
        brief_text: "BSc".to_string(),
        detailed_text: String::new(),
    };
    let created = education.create(&form).await.unwrap();
    assert_eq!(created.title, form.title);
    assert_eq!(created.detailed_text, "");

    let renamed = EducationForm { location: "Leeds".to_string(), ..form.clone() };
    let updated = education.update(created.id, &renamed).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.location, "Leeds");
    assert_eq!(education.get(created.id).await.unwrap(), updated);

    let skills: &dyn CvRepository<Skill> = repos.cv.skill.as_ref();
    let title = unique("Juggling");
    let skill = skills
        .create(&SkillForm { title: title.clone(), skill_type: "other".to_string() })
        .await
        .unwrap();
    assert_eq!(skill.skill_type, SkillType::Other);

    let others = skills.list_where("skill_type", "other").await.unwrap();
    assert!(others.iter().any(|s| s.id == skill.id));
    assert!(others.iter().all(|s| s.skill_type == SkillType::Other));

    let technical = skills
        .update(skill.id, &SkillForm { title, skill_type: "technical".to_string() })
        .await
        .unwrap();
    assert_eq!(technical.skill_type, SkillType::Technical);
    assert!(!skills.list_where("skill_type", "other").await.unwrap().iter().any(|s| s.id == skill.id));

    skills.delete(skill.id).await.unwrap();
    assert!(matches!(skills.get(skill.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(skills.list_where("not_a_column", "x").await, Err(AppError::InternalError(_))));
}
