//! In-process `Store` for exercising handlers without Postgres.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{Result, Store};
use crate::article::{Article, ArticleSummary};
use crate::comment::{Comment, NewComment};
use crate::topic::Topic;
use crate::users::models::User;

const IMG: &str = "https://images.pexels.com/photos/158651/news-newsletter-newspaper-information-158651.jpeg?w=700&h=700";

#[derive(Default)]
struct Tables {
    topics: Vec<Topic>,
    users: Vec<User>,
    articles: Vec<Article>,
    comments: Vec<Comment>,
    next_comment_id: i32,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("fixture date")
}

impl MemoryStore {
    /// Three topics (`paper` has no articles), four users, six articles.
    /// Article 1 has eleven comments, article 2 none.
    pub fn seeded() -> MemoryStore {
        let topics = vec![
            ("mitch", "The man, the Mitch, the legend"),
            ("cats", "Not dogs"),
            ("paper", "what books are made of"),
        ]
        .into_iter()
        .map(|(slug, description)| Topic {
            slug: slug.to_owned(),
            description: description.to_owned(),
        })
        .collect();

        let users = vec![
            ("butter_bridge", "jonny"),
            ("icellusedkars", "sam"),
            ("rogersop", "paul"),
            ("lurker", "do_nothing"),
        ]
        .into_iter()
        .map(|(username, name)| User {
            username: username.to_owned(),
            name: name.to_owned(),
            avatar_url: format!("https://example.com/avatars/{}.jpg", username),
        })
        .collect();

        let articles = vec![
            (
                1,
                "Living in the shadow of a great man",
                "mitch",
                "butter_bridge",
                at(2020, 7, 9, 20, 11),
                100,
            ),
            (2, "Sony Vaio; or, The Laptop", "mitch", "icellusedkars", at(2020, 10, 16, 5, 3), 0),
            (
                3,
                "Eight pug gifs that remind me of mitch",
                "mitch",
                "icellusedkars",
                at(2020, 11, 3, 9, 12),
                0,
            ),
            (4, "Student SUES Mitch!", "mitch", "rogersop", at(2020, 5, 6, 1, 14), 0),
            (
                5,
                "UNCOVERED: catspiracy to bring down democracy",
                "cats",
                "rogersop",
                at(2020, 8, 3, 13, 14),
                0,
            ),
            (6, "A", "mitch", "icellusedkars", at(2020, 10, 18, 1, 0), 0),
        ]
        .into_iter()
        .map(|(article_id, title, topic, author, created_at, votes)| Article {
            article_id,
            title: title.to_owned(),
            topic: topic.to_owned(),
            author: author.to_owned(),
            body: format!("{} ({})", title, topic),
            created_at,
            votes,
            article_img_url: IMG.to_owned(),
        })
        .collect();

        let mut comments = Vec::new();
        let placements = (1..=11).map(|n| (1, n)).chain(vec![(3, 1), (3, 2), (5, 1), (5, 2)]);
        for (comment_id, (article_id, n)) in (1..).zip(placements) {
            comments.push(Comment {
                comment_id,
                body: format!("comment {} on article {}", n, article_id),
                article_id,
                author: if n % 2 == 0 { "icellusedkars" } else { "butter_bridge" }.to_owned(),
                votes: n,
                created_at: at(2020, 1 + (comment_id as u32 % 12), 1 + n as u32, 12, 0),
            });
        }

        let next_comment_id = comments.len() as i32 + 1;
        MemoryStore {
            tables: Mutex::new(Tables {
                topics,
                users,
                articles,
                comments,
                next_comment_id,
            }),
            offline: AtomicBool::new(false),
        }
    }

    /// Every later call fails as if the database had gone away.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        if self.offline.load(Ordering::SeqCst) {
            bail!("store is offline");
        }
        self.tables.lock().map_err(|_| "store lock poisoned".into())
    }
}

fn newest_first(
    a: &NaiveDateTime,
    a_id: i32,
    b: &NaiveDateTime,
    b_id: i32,
) -> ::std::cmp::Ordering {
    b.cmp(a).then(b_id.cmp(&a_id))
}

impl Store for MemoryStore {
    fn topics(&self) -> Result<Vec<Topic>> {
        let mut topics = self.tables()?.topics.clone();
        topics.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(topics)
    }

    fn users(&self) -> Result<Vec<User>> {
        let mut users = self.tables()?.users.clone();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    fn topic_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.tables()?.topics.iter().any(|t| t.slug == slug))
    }

    fn user_exists(&self, username: &str) -> Result<bool> {
        Ok(self.tables()?.users.iter().any(|u| u.username == username))
    }

    fn article_exists(&self, article_id: i32) -> Result<bool> {
        Ok(self.tables()?.articles.iter().any(|a| a.article_id == article_id))
    }

    fn comment_exists(&self, comment_id: i32) -> Result<bool> {
        Ok(self.tables()?.comments.iter().any(|c| c.comment_id == comment_id))
    }

    fn article(&self, article_id: i32) -> Result<Article> {
        self.tables()?
            .articles
            .iter()
            .find(|a| a.article_id == article_id)
            .cloned()
            .ok_or_else(|| format!("no article {}", article_id).into())
    }

    fn articles(&self, topic: Option<&str>) -> Result<Vec<ArticleSummary>> {
        let tables = self.tables()?;
        let mut summaries: Vec<ArticleSummary> = tables
            .articles
            .iter()
            .filter(|a| topic.map_or(true, |t| a.topic == t))
            .map(|a| ArticleSummary {
                article_id: a.article_id,
                title: a.title.clone(),
                topic: a.topic.clone(),
                author: a.author.clone(),
                created_at: a.created_at,
                votes: a.votes,
                article_img_url: a.article_img_url.clone(),
                comment_count: tables
                    .comments
                    .iter()
                    .filter(|c| c.article_id == a.article_id)
                    .count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| {
            newest_first(&a.created_at, a.article_id, &b.created_at, b.article_id)
        });
        Ok(summaries)
    }

    fn comments(&self, article_id: i32) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .tables()?
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            newest_first(&a.created_at, a.comment_id, &b.created_at, b.comment_id)
        });
        Ok(comments)
    }

    fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        let mut tables = self.tables()?;
        let inserted = Comment {
            comment_id: tables.next_comment_id,
            body: comment.body.clone(),
            article_id: comment.article_id,
            author: comment.author.clone(),
            votes: 0,
            created_at: comment.created_at,
        };
        tables.next_comment_id += 1;
        tables.comments.push(inserted.clone());
        Ok(inserted)
    }

    fn delete_comment(&self, comment_id: i32) -> Result<bool> {
        let mut tables = self.tables()?;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.comment_id != comment_id);
        Ok(tables.comments.len() < before)
    }

    fn apply_vote_delta(&self, article_id: i32, delta: i32) -> Result<Option<Article>> {
        let mut tables = self.tables()?;
        match tables.articles.iter_mut().find(|a| a.article_id == article_id) {
            Some(article) => Ok(article.votes.checked_add(delta).map(|votes| {
                article.votes = votes;
                article.clone()
            })),
            None => bail!("no article {}", article_id),
        }
    }
}
