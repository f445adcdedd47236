//! 投稿・コメントのブロックを組み立てる
//!
//! 流れ（概要）
//! 1) 投稿ごとに `article` を作る（タイトル・本文・ID・投稿者・ボタン）
//! 2) 投稿者とコメントはその場で API から取得する（投稿 1 件につき 2 リクエスト）
//! 3) コメント欄 `section.comments.hide` を最後に付ける
//!
//! どの関数も文書の外で組み立てて返すだけです。`main` への挿入はページ側が行います。
//! 取得に失敗したときは、ブロック全体を捨てずに失敗を表す段落を入れます。

use crate::api::client::DataClient;
use crate::api::model::Comment;
use crate::api::model::Post;
use crate::constants::AUTHOR_FAILED_TEXT;
use crate::constants::COMMENTS_CLASS;
use crate::constants::COMMENTS_FAILED_TEXT;
use crate::constants::ERROR_TEXT_CLASS;
use crate::constants::HIDE_CLASS;
use crate::constants::POST_ID_ATTRIBUTE;
use crate::constants::SHOW_COMMENTS_LABEL;
use crate::renderer::builder::make_element;
use crate::renderer::dom::api::append_child;
use crate::renderer::dom::api::create_document_fragment;
use crate::renderer::dom::api::create_element;
use crate::renderer::dom::node::ElementKind;
use crate::renderer::dom::node::Node;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use tracing::warn;

/// コメント 1 件につき `article`（h3 名前 / p 本文 / p "From: メール"）を並べたフラグメント
pub fn build_comment_block(comments: Option<&[Comment]>) -> Option<Rc<RefCell<Node>>> {
    let comments = comments?;
    let fragment = create_document_fragment();
    for comment in comments {
        let article = create_element(ElementKind::Article);
        append_child(&article, make_element(ElementKind::H3, &comment.name, None));
        append_child(
            &article,
            make_element(ElementKind::default(), &comment.body, None),
        );
        append_child(
            &article,
            make_element(
                ElementKind::default(),
                &format!("From: {}", comment.email),
                None,
            ),
        );
        append_child(&fragment, article);
    }
    Some(fragment)
}

/// 投稿のコメント欄（最初は非表示）
pub async fn build_comments_section(
    client: &DataClient,
    post_id: Option<u32>,
) -> Option<Rc<RefCell<Node>>> {
    let post_id = post_id?;
    let section = create_element(ElementKind::Section);
    {
        let mut node = section.borrow_mut();
        node.set_attribute(POST_ID_ATTRIBUTE, &post_id.to_string());
        node.add_class(COMMENTS_CLASS);
        node.add_class(HIDE_CLASS);
    }

    match client.fetch_comments_for_post(Some(post_id)).await {
        Ok(comments) => {
            if let Some(block) = build_comment_block(comments.as_deref()) {
                append_child(&section, block);
            }
        }
        Err(e) => {
            warn!(post_id, error = %e, "failed to load comments");
            append_child(
                &section,
                make_element(
                    ElementKind::default(),
                    COMMENTS_FAILED_TEXT,
                    Some(ERROR_TEXT_CLASS),
                ),
            );
        }
    }
    Some(section)
}

/// 投稿 1 件ぶんの `article`
pub async fn build_post_block(client: &DataClient, post: Option<&Post>) -> Option<Rc<RefCell<Node>>> {
    let post = post?;
    let article = create_element(ElementKind::Article);
    append_child(&article, make_element(ElementKind::H2, &post.title, None));
    append_child(
        &article,
        make_element(ElementKind::default(), &post.body, None),
    );
    append_child(
        &article,
        make_element(
            ElementKind::default(),
            &format!("Post ID: {}", post.id),
            None,
        ),
    );

    let (author, catch_phrase) = match client.fetch_user(Some(post.user_id)).await {
        Ok(Some(user)) => (
            format!("Author: {} with {}", user.name, user.company.name),
            user.company.catch_phrase,
        ),
        Ok(None) => (AUTHOR_FAILED_TEXT.to_string(), String::new()),
        Err(e) => {
            warn!(post_id = post.id, user_id = post.user_id, error = %e, "failed to load author");
            (AUTHOR_FAILED_TEXT.to_string(), String::new())
        }
    };
    append_child(
        &article,
        make_element(ElementKind::default(), &author, None),
    );
    append_child(
        &article,
        make_element(ElementKind::default(), &catch_phrase, None),
    );

    let button = make_element(ElementKind::Button, SHOW_COMMENTS_LABEL, None);
    button
        .borrow_mut()
        .set_attribute(POST_ID_ATTRIBUTE, &post.id.to_string());
    append_child(&article, button);

    if let Some(section) = build_comments_section(client, Some(post.id)).await {
        append_child(&article, section);
    }
    Some(article)
}

/// 投稿ブロックを入力順に並べたフラグメント
///
/// 1 件ずつ順番に取得します（並べ替えは起きません）。
pub async fn build_posts_fragment(
    client: &DataClient,
    posts: Option<&[Post]>,
) -> Option<Rc<RefCell<Node>>> {
    let posts = posts?;
    debug!(count = posts.len(), "building post blocks");
    let fragment = create_document_fragment();
    for post in posts {
        if let Some(block) = build_post_block(client, Some(post)).await {
            append_child(&fragment, block);
        }
    }
    Some(fragment)
}
