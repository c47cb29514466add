//! Page rendering
//!
//! Every page is its own template rendered into the `base` layout. Posts go
//! through the `post` template wherever they appear.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};

use super::markup::{
    escape, format_content, Markup, ACTION_LINK_CLASS, BACKLINK_CLASS, BOARD_LINK_CLASS,
    CURRENT_PAGE_CLASS, EMPTY_CLASS, NAV_LINK_CLASS, OMITTED_CLASS, OP_FRAME_CLASS,
    PAGE_LINK_CLASS, REPLY_FRAME_CLASS, THREAD_TITLE_CLASS,
};
use super::template::{Result, TemplateContext, TemplateRegistry};
use crate::ban::Ban;
use crate::board::{PostView, ThreadView};
use crate::models::{
    BoardId, BoardInfo, Paginated, Post, PostId, ThreadTitle, DEFAULT_MAX_CONTENT_LEN,
};

const SITE_NAME: &str = "frogboard";

/// Binds posts into HTML documents
#[derive(Debug, Clone)]
pub struct Renderer {
    templates: TemplateRegistry,
    site_name: String,
    max_content_len: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One post as it appears on a page
struct Entry<'a> {
    post: &'a Post,
    frame_class: &'static str,
    permalink: String,
    title: Option<&'a ThreadTitle>,
    backlinks: Option<Markup>,
    actions: Option<Markup>,
}

impl Renderer {
    /// Renderer over the built-in templates.
    pub fn new() -> Self {
        Self::with_templates(TemplateRegistry::builtin())
    }

    pub fn with_templates(templates: TemplateRegistry) -> Self {
        Self {
            templates,
            site_name: SITE_NAME.to_owned(),
            max_content_len: DEFAULT_MAX_CONTENT_LEN,
        }
    }

    pub fn site_name(mut self, name: impl Into<String>) -> Self {
        self.site_name = name.into();
        self
    }

    /// Limit advertised on posting forms.
    pub fn max_content_len(mut self, max: usize) -> Self {
        self.max_content_len = max;
        self
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Render posts, in the order given, as one feed document.
    ///
    /// A `>>N` citation links to `#pN` when post N is part of the same
    /// document and renders dead otherwise. An empty sequence gives a
    /// document with no post entries.
    ///
    /// # Errors
    /// [`TemplateBindingError`](super::TemplateBindingError) when a template
    /// needs a variable that was not bound.
    pub fn render<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> Result<Markup> {
        self.render_feed(&self.site_name, posts)
    }

    /// [`render`](Self::render) with an explicit heading.
    pub fn render_feed<'a>(
        &self,
        heading: &str,
        posts: impl IntoIterator<Item = &'a Post>,
    ) -> Result<Markup> {
        let posts: Vec<&Post> = posts.into_iter().collect();
        let present: HashSet<PostId> = posts.iter().map(|p| p.id()).collect();
        let local = |id: PostId| present.contains(&id).then(|| fragment(id));

        let entries = posts
            .iter()
            .map(|&post| {
                self.entry(
                    Entry {
                        post,
                        frame_class: REPLY_FRAME_CLASS,
                        permalink: fragment(post.id()),
                        title: None,
                        backlinks: None,
                        actions: None,
                    },
                    local,
                )
            })
            .collect::<Result<Markup>>()?;

        let mut ctx = TemplateContext::new()
            .text("heading", heading)
            .text("count", count_label(posts.len(), "post", "posts"))
            .html("posts", entries);
        if posts.is_empty() {
            ctx = ctx.html("empty", empty_note("No posts yet."));
        }

        let body = self.templates.render("feed", &ctx)?;
        self.page(heading, None, body)
    }

    /// Front page listing every board.
    pub fn render_index(&self, boards: &[BoardInfo]) -> Result<Markup> {
        let items: Markup = boards
            .iter()
            .map(|board| {
                Markup::trusted(format!(
                    r#"<li><a href="{}" class="{BOARD_LINK_CLASS}">/{}/ - {}</a></li>"#,
                    escape(&board.path()),
                    escape(board.id.as_str()),
                    escape(&board.full_name)
                ))
            })
            .collect();

        let ctx = TemplateContext::new()
            .text("site_name", &self.site_name)
            .html("boards", items);
        let body = self.templates.render("index", &ctx)?;
        self.page(&self.site_name, Some(boards), body)
    }

    /// Board front page: thread previews, page links and the new thread form.
    pub fn render_board_page(
        &self,
        board: &BoardInfo,
        boards: &[BoardInfo],
        page: &Paginated<ThreadView>,
    ) -> Result<Markup> {
        let on_page: HashSet<PostId> = page
            .items
            .iter()
            .flat_map(|t| std::iter::once(&t.op).chain(&t.replies))
            .map(|view| view.post.id())
            .collect();
        let links = BoardLinks {
            board: &board.id,
            on_page: &on_page,
        };

        let threads = page
            .items
            .iter()
            .map(|thread| self.preview(&links, thread))
            .collect::<Result<Markup>>()?;

        let mut ctx = self
            .board_context(board)
            .html("threads", threads)
            .html("pages", page_links(board, page));
        if page.items.is_empty() {
            ctx = ctx.html("empty", empty_note("No threads here yet."));
        }

        let body = self.templates.render("board", &ctx)?;
        self.page(&format!("/{}/ - {}", board.id, board.full_name), Some(boards), body)
    }

    /// A whole thread with the reply form.
    pub fn render_thread_page(
        &self,
        board: &BoardInfo,
        boards: &[BoardInfo],
        thread: &ThreadView,
    ) -> Result<Markup> {
        let on_page: HashSet<PostId> = std::iter::once(&thread.op)
            .chain(&thread.replies)
            .map(|view| view.post.id())
            .collect();
        let links = BoardLinks {
            board: &board.id,
            on_page: &on_page,
        };

        let op = self.board_entry(&links, thread, &thread.op, OP_FRAME_CLASS, None)?;
        let replies = thread
            .replies
            .iter()
            .map(|reply| self.board_entry(&links, thread, reply, REPLY_FRAME_CLASS, None))
            .collect::<Result<Markup>>()?;

        let ctx = self
            .board_context(board)
            .text("thread_path", thread_path(&board.id, thread.id()))
            .text("reply_count", count_label(thread.reply_count(), "reply", "replies"))
            .html("op", op)
            .html("replies", replies);

        let body = self.templates.render("thread", &ctx)?;
        let title = if thread.title.is_empty() {
            format!("/{}/ - No.{}", board.id, thread.id())
        } else {
            format!("/{}/ - {}", board.id, thread.title.as_str())
        };
        self.page(&title, Some(boards), body)
    }

    /// Shown to banned addresses instead of any other page.
    pub fn render_ban_page(&self, ban: &Ban) -> Result<Markup> {
        let ctx = TemplateContext::new()
            .text("ip", ban.ip.to_string())
            .text("reason", display_reason(&ban.reason))
            .text("start", display_time(ban.start))
            .text("end", display_time(ban.end));
        let body = self.templates.render("banned", &ctx)?;
        self.page("Banned", None, body)
    }

    fn page(&self, title: &str, boards: Option<&[BoardInfo]>, body: Markup) -> Result<Markup> {
        let mut ctx = TemplateContext::new()
            .text("title", title)
            .text("site_name", &self.site_name)
            .html("body", body);
        if let Some(boards) = boards.filter(|b| !b.is_empty()) {
            ctx = ctx.html("nav", nav(boards));
        }
        self.templates.render("base", &ctx)
    }

    fn board_context(&self, board: &BoardInfo) -> TemplateContext {
        TemplateContext::new()
            .text("board_id", board.id.as_str())
            .text("board_name", &board.full_name)
            .text("board_path", board.path())
            .text("max_content_len", self.max_content_len.to_string())
    }

    fn preview(&self, links: &BoardLinks<'_>, thread: &ThreadView) -> Result<Markup> {
        let reply_link = Markup::trusted(format!(
            r#"<a href="{}" class="{ACTION_LINK_CLASS}">[Reply]</a>"#,
            escape(&thread_path(links.board, thread.id()))
        ));
        let op = self.board_entry(links, thread, &thread.op, OP_FRAME_CLASS, Some(reply_link))?;
        let replies = thread
            .replies
            .iter()
            .map(|reply| self.board_entry(links, thread, reply, REPLY_FRAME_CLASS, None))
            .collect::<Result<Markup>>()?;

        let mut ctx = TemplateContext::new()
            .html("op", op)
            .html("replies", replies);
        if thread.omitted > 0 {
            ctx = ctx.html(
                "omitted",
                Markup::trusted(format!(
                    r#"<p class="{OMITTED_CLASS}">{} omitted. <a href="{}" class="{ACTION_LINK_CLASS}">View thread</a></p>"#,
                    count_label(thread.omitted, "reply", "replies"),
                    escape(&thread_path(links.board, thread.id()))
                )),
            );
        }
        self.templates.render("preview", &ctx)
    }

    fn board_entry(
        &self,
        links: &BoardLinks<'_>,
        thread: &ThreadView,
        view: &PostView,
        frame_class: &'static str,
        actions: Option<Markup>,
    ) -> Result<Markup> {
        let is_op = view.post.id() == thread.id();
        let backlinks = (!view.cited_by.is_empty()).then(|| {
            let anchors: String = view
                .cited_by
                .iter()
                .map(|id| {
                    format!(
                        r#"<a href="{}" class="{BACKLINK_CLASS}">&gt;&gt;{id}</a>"#,
                        escape(&links.href(*id))
                    )
                })
                .collect();
            Markup::trusted(format!(
                r#"<footer data-role="backlinks" class="mt-2 text-xs text-gray-500">Replies: {anchors}</footer>"#
            ))
        });

        self.entry(
            Entry {
                post: &view.post,
                frame_class,
                permalink: format!("{}#{}", thread_path(links.board, thread.id()), view.post.anchor()),
                title: is_op.then_some(&thread.title),
                backlinks,
                actions,
            },
            |id| view.cites.contains(&id).then(|| links.href(id)),
        )
    }

    fn entry(&self, entry: Entry<'_>, link: impl Fn(PostId) -> Option<String>) -> Result<Markup> {
        let post = entry.post;
        let mut ctx = TemplateContext::new()
            .text("anchor", post.anchor())
            .text("id", post.id().to_string())
            .text("frame_class", entry.frame_class)
            .text("author", post.author().as_str())
            .text(
                "created_at",
                post.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .text("created_display", display_time(post.created_at()))
            .text("permalink", entry.permalink)
            .html("content", format_content(post.content().as_str(), link));

        if let Some(title) = entry.title.filter(|t| !t.is_empty()) {
            ctx = ctx.html(
                "title",
                Markup::trusted(format!(
                    r#"<span class="{THREAD_TITLE_CLASS}">{}</span>"#,
                    escape(title.as_str())
                )),
            );
        }
        if let Some(backlinks) = entry.backlinks {
            ctx = ctx.html("backlinks", backlinks);
        }
        if let Some(actions) = entry.actions {
            ctx = ctx.html("actions", actions);
        }

        self.templates.render("post", &ctx)
    }
}

/// Link targets for posts on a board page
struct BoardLinks<'a> {
    board: &'a BoardId,
    on_page: &'a HashSet<PostId>,
}

impl BoardLinks<'_> {
    /// In-page fragment when the post is shown, otherwise its permalink
    /// route (which redirects replies to their thread).
    fn href(&self, id: PostId) -> String {
        if self.on_page.contains(&id) {
            fragment(id)
        } else {
            thread_path(self.board, id)
        }
    }
}

/// Content of a post as shown on its board, for API clients.
pub fn board_content(board: &BoardId, view: &PostView) -> Markup {
    format_content(view.post.content().as_str(), |id| {
        view.cites.contains(&id).then(|| thread_path(board, id))
    })
}

fn fragment(id: PostId) -> String {
    format!("#p{id}")
}

fn thread_path(board: &BoardId, id: PostId) -> String {
    format!("/{board}/{id}/")
}

fn nav(boards: &[BoardInfo]) -> Markup {
    let links: Vec<String> = boards
        .iter()
        .map(|b| {
            format!(
                r#"<a href="{}" class="{NAV_LINK_CLASS}" title="{}">{}</a>"#,
                escape(&b.path()),
                escape(&b.full_name),
                escape(b.id.as_str())
            )
        })
        .collect();
    Markup::trusted(format!("[{}]", links.join("/")))
}

fn page_links(board: &BoardInfo, page: &Paginated<ThreadView>) -> Markup {
    let path = escape(&board.path());
    let link = |n: usize, label: &str, class: &str| {
        Markup::trusted(format!(r#"<a href="{path}?page={n}" class="{class}">{label}</a>"#))
    };

    let prev = page
        .has_prev()
        .then(|| link(page.page - 1, "Previous", PAGE_LINK_CLASS));
    let next = page
        .has_next()
        .then(|| link(page.page + 1, "Next", PAGE_LINK_CLASS));
    let numbers = page.page_numbers().map(|n| {
        let class = if n == page.page {
            CURRENT_PAGE_CLASS
        } else {
            PAGE_LINK_CLASS
        };
        link(n, &n.to_string(), class)
    });

    prev.into_iter().chain(numbers).chain(next).collect()
}

fn empty_note(text: &str) -> Markup {
    Markup::trusted(format!(r#"<p class="{EMPTY_CLASS}">{}</p>"#, escape(text)))
}

fn count_label(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

fn display_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn display_reason(reason: &str) -> &str {
    if reason.trim().is_empty() {
        "No reason given"
    } else {
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardAggregator, Order};
    use crate::models::{Author, Pagination, PostContent};
    use crate::render::{markup::DEAD_CITATION_CLASS, TemplateBindingError, Template};
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn entries(html: &Markup) -> usize {
        html.as_str().matches(r#"data-role="post""#).count()
    }

    fn seeded() -> BoardAggregator {
        let board = BoardAggregator::new(BoardInfo::new("b", "Random").unwrap());
        let op = board
            .create_thread(
                ThreadTitle::new("frogs").unwrap(),
                PostContent::new("ribbit").unwrap(),
                Author::default(),
                at(0),
            )
            .unwrap();
        board
            .reply(op.id(), PostContent::new(">>1 croak\n>>5 nope").unwrap(), Author::default(), at(1))
            .unwrap();
        board
    }

    #[test]
    fn empty_feed_has_no_entries() {
        let html = Renderer::new().render(std::iter::empty()).unwrap();
        assert_eq!(entries(&html), 0);
        assert!(html.as_str().contains("No posts yet."));
        assert!(html.as_str().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn feed_keeps_given_order() {
        let board = seeded();
        let listing = board.list_posts(Order::Descending);
        let html = Renderer::new().render(&listing).unwrap();

        assert_eq!(entries(&html), 2);
        let second = html.as_str().find(r#"id="p2""#).unwrap();
        let first = html.as_str().find(r#"id="p1""#).unwrap();
        assert!(second < first);
        assert!(html.as_str().contains("2 posts"));
    }

    #[test]
    fn feed_links_only_posts_in_document() {
        let post = Post::new(2, ">>1 hi", "a", at(0)).unwrap();
        let html = Renderer::new().render([&post]).unwrap();
        assert!(html.as_str().contains(DEAD_CITATION_CLASS));
        assert!(!html.as_str().contains(r##"href="#p1""##));
    }

    #[test]
    fn escapes_author() {
        let post = Post::new(1, "x", "<b>mallory</b>", at(0)).unwrap();
        let html = Renderer::new().render([&post]).unwrap();
        assert!(html.as_str().contains("&lt;b&gt;mallory&lt;/b&gt;"));
        assert!(!html.as_str().contains("<b>mallory"));
    }

    #[test]
    fn missing_slot_in_custom_template() {
        let mut templates = TemplateRegistry::builtin();
        templates.register(Template::new("post", "{{ signature }}"));
        let post = Post::new(1, "x", "a", at(0)).unwrap();

        let err = Renderer::with_templates(templates).render([&post]).unwrap_err();
        assert!(matches!(
            err,
            TemplateBindingError::MissingVariable { ref variable, .. } if variable == "signature"
        ));
    }

    #[test]
    fn thread_page_links_citations_and_backlinks() {
        let board = seeded();
        let thread = board.thread(PostId::FIRST).unwrap();
        let html = Renderer::new()
            .render_thread_page(board.info(), &[board.info().clone()], &thread)
            .unwrap();
        let html = html.as_str();

        assert!(html.contains(r##"<a href="#p1""##));
        assert!(html.contains(r#"data-role="backlinks""#));
        assert!(html.contains(r##"href="#p2" class="mr-1"##));
        assert!(html.contains(r#"action="/b/1/""#));
        assert!(html.contains("frogs"));
        assert!(html.contains("1 reply"));
    }

    #[test]
    fn board_page_previews_and_pages() {
        let board = seeded();
        for i in 0..6 {
            board
                .reply(PostId::FIRST, PostContent::new("more").unwrap(), Author::default(), at(2 + i))
                .unwrap();
        }
        let page = board.latest_threads(Pagination::default(), 5);
        let html = Renderer::new()
            .render_board_page(board.info(), &[board.info().clone()], &page)
            .unwrap();
        let html = html.as_str();

        assert_eq!(html.matches(r#"data-role="thread""#).count(), 1);
        assert!(html.contains("2 replies omitted."));
        assert!(html.contains("[Reply]"));
        assert!(html.contains(r#"href="/b/?page=1""#));
        // >>1 is on the page; the backlink from reply 2 is not
        assert!(html.contains(r#"href="/b/2/""#));
    }

    #[test]
    fn board_page_prev_next_links() {
        let board = BoardAggregator::new(BoardInfo::new("b", "Random").unwrap());
        for i in 0..3 {
            board
                .create_thread(ThreadTitle::default(), PostContent::new("op").unwrap(), Author::default(), at(i))
                .unwrap();
        }
        let render = |n| {
            let page = board.latest_threads(Pagination::new(n, 1), 0);
            Renderer::new()
                .render_board_page(board.info(), &[], &page)
                .unwrap()
                .into_string()
        };

        let first = render(1);
        assert!(!first.contains(">Previous</a>"));
        assert!(first.contains(r#"href="/b/?page=2" class="rounded border border-gray-300 px-2 py-1 hover:bg-emerald-100">Next</a>"#));

        let middle = render(2);
        assert!(middle.contains(r#"href="/b/?page=1" class="rounded border border-gray-300 px-2 py-1 hover:bg-emerald-100">Previous</a>"#));
        assert!(middle.contains(r#"href="/b/?page=3" class="rounded border border-gray-300 px-2 py-1 hover:bg-emerald-100">Next</a>"#));

        let last = render(3);
        assert!(last.contains(">Previous</a>"));
        assert!(!last.contains(">Next</a>"));
    }

    #[test]
    fn empty_board_page() {
        let board = BoardAggregator::new(BoardInfo::new("g", "Technology").unwrap());
        let page = board.latest_threads(Pagination::default(), 5);
        let html = Renderer::new()
            .render_board_page(board.info(), &[], &page)
            .unwrap();
        assert!(html.as_str().contains("No threads here yet."));
        assert!(html.as_str().contains("/g/ - Technology"));
    }

    #[test]
    fn index_lists_boards() {
        let boards = vec![
            BoardInfo::new("b", "Random").unwrap(),
            BoardInfo::new("g", "Technology").unwrap(),
        ];
        let html = Renderer::new().render_index(&boards).unwrap();
        assert!(html.as_str().contains(r#"href="/g/""#));
        assert!(html.as_str().contains("/b/ - Random"));
    }

    #[test]
    fn ban_page() {
        let ban = Ban {
            ip: "203.0.113.9".parse().unwrap(),
            reason: String::new(),
            start: at(0),
            end: at(60),
        };
        let html = Renderer::new().render_ban_page(&ban).unwrap();
        assert!(html.as_str().contains("203.0.113.9"));
        assert!(html.as_str().contains("No reason given"));
        assert!(html.as_str().contains("2024-01-01 01:00:00 UTC"));
    }

    #[test]
    fn api_content_uses_board_routes() {
        let board = seeded();
        let view = board.post(PostId::new(2).unwrap()).unwrap();
        let html = board_content(&board.info().id, &view);
        assert!(html.as_str().contains(r#"href="/b/1/""#));
        assert!(html.as_str().contains(DEAD_CITATION_CLASS));
    }
}
