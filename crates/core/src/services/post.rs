//! Post service.

use chrono::Utc;
use serde::Deserialize;
use terrace_common::{AppError, AppResult, IdGenerator, to_millis};
use terrace_store::collections::TypedSubscription;
use terrace_store::documents::{Comment, CreatedBy, Post};
use terrace_store::{PostsCollection, UsersCollection};
use validator::Validate;

/// Fixed message shown when a non-admin attempts a gated operation.
const ADMIN_ONLY: &str = "Only club admins can manage posts";

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    /// Post title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Post body.
    #[validate(length(min = 1, max = 10_000))]
    pub content: String,
}

/// Post service for admin announcements.
#[derive(Clone)]
pub struct PostService {
    posts: PostsCollection,
    users: UsersCollection,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(posts: PostsCollection, users: UsersCollection) -> Self {
        Self {
            posts,
            users,
            id_gen: IdGenerator::new(),
        }
    }

    /// Fail unless the user carries the admin flag.
    ///
    /// Enforcement here is client-requested; the backing service is
    /// trusted to enforce the same rule on its side.
    async fn require_admin(&self, user_id: &str) -> AppResult<()> {
        let profile = self.users.require(user_id).await?;
        if profile.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(ADMIN_ONLY.to_string()))
        }
    }

    /// Create a post. Admin only.
    pub async fn create(&self, user_id: &str, input: CreatePostInput) -> AppResult<Post> {
        self.require_admin(user_id).await?;
        input.validate()?;

        let author = self.users.require(user_id).await?;
        let post = Post {
            id: self.id_gen.generate(),
            title: input.title,
            content: input.content,
            created_by: CreatedBy {
                user_id: author.id,
                user_name: author.display_name,
            },
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        };

        self.posts.insert(&post).await?;
        Ok(post)
    }

    /// Get a post by ID.
    pub async fn get(&self, post_id: &str) -> AppResult<Post> {
        self.posts.require(post_id).await
    }

    /// List all posts, newest first.
    pub async fn list(&self) -> AppResult<Vec<Post>> {
        self.posts.list().await
    }

    /// Subscribe to the ordered live post list.
    pub async fn subscribe(&self) -> AppResult<TypedSubscription<Post>> {
        self.posts.subscribe().await
    }

    /// Edit a post's body. Admin only.
    pub async fn edit(&self, post_id: &str, user_id: &str, content: &str) -> AppResult<()> {
        self.require_admin(user_id).await?;
        if content.trim().is_empty() {
            return Err(AppError::BadRequest("Post content is empty".to_string()));
        }
        self.posts
            .set_content(post_id, content, to_millis(Utc::now()))
            .await
    }

    /// Delete a post. Admin only.
    pub async fn delete(&self, post_id: &str, user_id: &str) -> AppResult<()> {
        self.require_admin(user_id).await?;
        self.posts.require(post_id).await?;
        self.posts.delete(post_id).await
    }

    /// Toggle the caller's like on a post. Open to any member; same
    /// semantics as event likes.
    pub async fn toggle_like(&self, post_id: &str, user_id: &str) -> AppResult<bool> {
        let post = self.posts.require(post_id).await?;
        if post.likes.iter().any(|liker| liker == user_id) {
            self.posts.remove_like(post_id, user_id).await?;
            Ok(false)
        } else {
            self.posts.add_like(post_id, user_id).await?;
            Ok(true)
        }
    }

    /// Append a comment to a post. Open to any member.
    pub async fn add_comment(
        &self,
        post_id: &str,
        user_id: &str,
        user_name: &str,
        text: &str,
    ) -> AppResult<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Comment text is empty".to_string()));
        }

        let comment = Comment {
            id: self.id_gen.generate(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };

        self.posts.push_comment(post_id, &comment).await?;
        Ok(comment)
    }
}
