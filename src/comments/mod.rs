use crate::{
    error::{Error, Result},
    models::Comment,
    utils::is_blank,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentOrigin {
    /// Came from the comments asset.
    Remote,
    /// Typed by the user in this session and echoed locally.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub comment: Comment,
    pub origin: CommentOrigin,
}

/// Placeholder author attached to locally echoed comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAuthor {
    pub username: String,
    pub pic_url: Option<String>,
}

impl Default for LocalAuthor {
    fn default() -> Self {
        Self {
            username: "You".to_string(),
            pic_url: None,
        }
    }
}

/// Newest-first comment list for the displayed video.
///
/// Only row 0 can be highlighted, and only while it holds a comment appended with
/// [`CommentState::append_local`].
#[derive(Debug, Default)]
pub struct CommentState {
    rows: Vec<CommentRow>,
    highlight_top_row: bool,
    author: LocalAuthor,
    local_count: i64,
}

impl CommentState {
    pub fn new(author: LocalAuthor) -> Self {
        Self {
            author,
            ..Self::default()
        }
    }

    pub fn load(&mut self, comments: Vec<Comment>) {
        self.rows = comments
            .into_iter()
            .map(|comment| CommentRow {
                comment,
                origin: CommentOrigin::Remote,
            })
            .collect();
        self.highlight_top_row = false;
    }

    /// Inserts the user's comment at the top without submitting it anywhere.
    pub fn append_local(&mut self, text: &str) -> Result<&Comment> {
        if is_blank(text) {
            return Err(Error::EmptyInput);
        }

        // Negative ids never collide with the asset's ids.
        self.local_count += 1;
        let comment = Comment {
            id: Some(-self.local_count),
            username: Some(self.author.username.clone()),
            pic_url: self.author.pic_url.clone(),
            comment: Some(text.trim().to_string()),
        };
        debug!("Appending local comment {:?}", comment.id);

        self.rows.insert(
            0,
            CommentRow {
                comment,
                origin: CommentOrigin::Local,
            },
        );
        self.highlight_top_row = true;

        Ok(&self.rows[0].comment)
    }

    pub fn clear_highlight(&mut self) {
        self.highlight_top_row = false;
    }

    pub fn highlight_top_row(&self) -> bool {
        self.highlight_top_row
    }

    pub fn is_highlighted(&self, row: usize) -> bool {
        row == 0 && self.highlight_top_row
    }

    pub fn rows(&self) -> &[CommentRow] {
        &self.rows
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.rows.iter().map(|row| &row.comment)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
