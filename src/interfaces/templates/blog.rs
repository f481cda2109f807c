use crate::{
    entities::{comment::Comment, post::PostSummary},
    interfaces::templates::layout::{format_date, Page},
    use_cases::blog::PostDetail,
    utils::markdown::{escape, linebreaks},
};

/// The published listing, or the drafts listing when `drafts` is set.
pub fn post_list(page: &Page, posts: &[PostSummary], drafts: bool) -> String {
    let heading = if drafts { "Drafts" } else { "Posts" };

    let new_post = if page.is_authenticated() {
        r#"<a class="btn btn-outline-light center" id="new-post" href="/blog/post/new/">New Post</a>"#
    } else {
        ""
    };

    let cards: String = if posts.is_empty() {
        r#"<p class="empty">Nothing here yet.</p>"#.to_string()
    } else {
        posts.iter().map(|summary| post_card(summary, drafts)).collect()
    };

    page.render(&format!(
        r#"<div class="post-list">
<h1>{heading}</h1>
{new_post}
{cards}
</div>"#
    ))
}

fn post_card(summary: &PostSummary, drafts: bool) -> String {
    let post = &summary.post;
    let date = if drafts {
        format!("created: {}", format_date(&post.created_date))
    } else {
        post.published_date
            .as_ref()
            .map(|d| format!("published: {}", format_date(d)))
            .unwrap_or_default()
    };

    format!(
        r#"<div class="card post">
<div class="card-body">
<h2 class="card-title"><a href="/blog/post/{id}/">{title}</a></h2>
<p class="subtitle">{subtitle}</p>
<p class="date">{date}</p>
<p class="card-comments">Comments: {count}</p>
</div>
</div>
"#,
        id = post.id,
        title = escape(&post.title),
        subtitle = escape(&post.subtitle),
        count = summary.approved_comments,
    )
}

pub fn post_detail(page: &Page, detail: &PostDetail) -> String {
    let post = &detail.post;

    let date = post
        .published_date
        .as_ref()
        .map(|d| format!(r#"<p class="date">published: {}</p>"#, format_date(d)))
        .unwrap_or_default();

    let owner_buttons = if page.is_authenticated() {
        let publish = if post.is_published() {
            String::new()
        } else {
            format!(
                r#"<form method="POST" action="/blog/post/{}/publish/" class="inline-form"><button type="submit" class="btn btn-secondary" id="publish">Publish</button></form>"#,
                post.id
            )
        };
        format!(
            r#"<div class="post-buttons">
{publish}
<a class="btn btn-secondary" id="edit" href="/blog/post/{id}/edit/">Edit</a>
<a class="btn btn-secondary" id="remove" href="/blog/post/{id}/remove/">Remove</a>
</div>"#,
            id = post.id
        )
    } else {
        String::new()
    };

    let comments: String = if detail.comments.is_empty() {
        r#"<p class="no-comments">No comments here yet :(</p>"#.to_string()
    } else {
        detail
            .comments
            .iter()
            .map(|comment| render_comment(page, comment))
            .collect()
    };

    page.render(&format!(
        r#"<div class="post-detail">
{owner_buttons}
<h1>{title}</h1>
<p class="subtitle">{subtitle}</p>
{date}
<div class="post-text">{text}</div>
<hr>
<a class="btn btn-secondary" id="add-comment" href="/blog/post/{id}/comment/">Add comment</a>
<div class="comments">
{comments}</div>
</div>"#,
        id = post.id,
        title = escape(&post.title),
        subtitle = escape(&post.subtitle),
        text = post.text_html(),
    ))
}

fn render_comment(page: &Page, comment: &Comment) -> String {
    let moderation = if page.is_authenticated() {
        let approve = if comment.approved_comment {
            String::new()
        } else {
            format!(
                r#"<form method="POST" action="/blog/comment/{}/approve/" class="inline-form"><button type="submit" class="btn btn-sm btn-success approve">Approve</button></form>"#,
                comment.id
            )
        };
        format!(
            r#"{approve}<a class="btn btn-sm btn-danger remove" href="/blog/comment/{}/remove/">Remove</a>"#,
            comment.id
        )
    } else {
        String::new()
    };

    let state = if comment.approved_comment { "approved" } else { "pending" };

    format!(
        r#"<div class="comment {state}" id="comment-{id}">
<div class="date">{date} {moderation}</div>
<strong>{author}</strong>
<p>{text}</p>
</div>
"#,
        id = comment.id,
        date = format_date(&comment.created_date),
        author = escape(&comment.author),
        text = linebreaks(&comment.text),
    )
}
