use std::{
    collections::HashMap,
    fs::{create_dir_all, read_dir, read_to_string, write},
    hash::Hash,
    io,
    path::PathBuf,
};

use chrono::{DateTime, Utc};
use json::{object, JsonValue};
use rand::distributions::{Alphanumeric, DistString};
use tracing::warn;

use crate::data::{
    Account, Comment, CommentID, ElementKind, Message, MessageID, Opportunity, OpportunityID,
    Portfolio, PortfolioElement, Post, PostID, Profile, UserID,
};

pub(super) const ACCOUNTS_PATH: &str = "accounts";
pub(super) const PROFILES_PATH: &str = "profiles";
pub(super) const POSTS_PATH: &str = "posts";
pub(super) const OPPORTUNITIES_PATH: &str = "opportunities";
pub(super) const MESSAGES_PATH: &str = "messages";
pub(super) const PORTFOLIOS_PATH: &str = "portfolios";

const ID_LENGTH: usize = 24;

/// One JSON file per document, one directory per collection.
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, collection: &str, id: &str) -> PathBuf {
        self.root.join(collection).join(format!("{id}.json"))
    }

    fn documents(&self, collection: &str) -> Vec<(String, JsonValue)> {
        let Ok(dir) = read_dir(self.root.join(collection)) else {
            return vec![];
        };
        dir.filter_map(|entry| {
            let path = entry.ok()?.path();
            let id = path.file_stem()?.to_str()?.to_string();
            let parsed = read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| json::parse(&text).map_err(|e| e.to_string()));
            match parsed {
                Ok(json) => Some((id, json)),
                Err(e) => {
                    warn!("Skipping unreadable document {}: {e}", path.display());
                    None
                }
            }
        })
        .collect()
    }

    fn write_document(&self, collection: &str, id: &str, json: JsonValue) -> io::Result<()> {
        create_dir_all(self.root.join(collection))?;
        write(self.document_path(collection, id), json.dump())
    }

    fn gen_id(&self, collection: &str) -> String {
        loop {
            let id = Alphanumeric.sample_string(&mut rand::thread_rng(), ID_LENGTH);
            if !self.document_path(collection, &id).exists() {
                return id;
            }
        }
    }

    pub fn gen_user_id(&self) -> UserID {
        UserID(self.gen_id(ACCOUNTS_PATH))
    }

    pub fn gen_post_id(&self) -> PostID {
        PostID(self.gen_id(POSTS_PATH))
    }

    pub fn gen_opportunity_id(&self) -> OpportunityID {
        OpportunityID(self.gen_id(OPPORTUNITIES_PATH))
    }

    pub fn gen_message_id(&self) -> MessageID {
        MessageID(self.gen_id(MESSAGES_PATH))
    }

    pub fn gen_comment_id(&self) -> CommentID {
        CommentID(Alphanumeric.sample_string(&mut rand::thread_rng(), ID_LENGTH))
    }
}

fn date(json: &JsonValue) -> Option<DateTime<Utc>> {
    json.as_str().and_then(|x| x.parse::<DateTime<Utc>>().ok())
}

fn date_json(date: &DateTime<Utc>) -> JsonValue {
    date.to_rfc3339().into()
}

fn string_list(json: &JsonValue) -> Option<Vec<String>> {
    match json {
        JsonValue::Array(items) => Some(items.iter().filter_map(|x| x.as_str()).map(str::to_string).collect()),
        _ => None,
    }
}

fn id_list<T>(json: &JsonValue, id: fn(String) -> T) -> Vec<T> {
    string_list(json).unwrap_or_default().into_iter().map(id).collect()
}

fn ids_json<'a, I>(ids: I) -> JsonValue
where
    I: IntoIterator<Item = &'a String>,
{
    ids.into_iter().map(|x| x.as_str()).collect::<Vec<_>>().into()
}

/// Name of the field that made a document unusable.
type MissingField = &'static str;

fn text<'a>(json: &'a JsonValue, key: MissingField) -> Result<&'a str, MissingField> {
    json[key].as_str().ok_or(key)
}

fn date_field(json: &JsonValue, key: MissingField) -> Result<DateTime<Utc>, MissingField> {
    date(&json[key]).ok_or(key)
}

impl Store {
    /// Parses every document of `collection`. Documents missing a required
    /// field are skipped with a warning.
    fn load<K, T, P>(&self, collection: &str, key: fn(String) -> K, parse: P) -> HashMap<K, T>
    where
        K: Eq + Hash,
        P: Fn(&str, &JsonValue) -> Result<T, MissingField>,
    {
        self.documents(collection).into_iter().filter_map(|(id, json)| match parse(&id, &json) {
            Ok(doc) => Some((key(id), doc)),
            Err(field) => {
                warn!("Skipping {collection} document {id}: missing or invalid {field}");
                None
            }
        }).collect()
    }

    pub(super) fn load_accounts(&self) -> HashMap<UserID, Account> {
        self.load(ACCOUNTS_PATH, UserID, |_, json| Ok(Account {
            username: text(json, "username")?.to_string(),
            created_at: date_field(json, "createdAt")?,
        }))
    }

    pub(super) fn store_account(&self, id: &UserID, account: &Account) -> io::Result<()> {
        self.write_document(ACCOUNTS_PATH, id.as_str(), object! {
            username: account.username.as_str(),
            "createdAt": date_json(&account.created_at),
        })
    }

    pub(super) fn load_profiles(&self) -> HashMap<UserID, Profile> {
        self.load(PROFILES_PATH, UserID, |id, json| {
            let created_at = date_field(json, "createdAt")?;
            let interests = string_list(&json["interests"]).unwrap_or_else(|| {
                warn!("Profile {id} has invalid interests data");
                vec![]
            });
            Ok(Profile {
                username: json["username"].as_str().unwrap_or_default().to_string(),
                profile_picture: json["profilePicture"].as_str().unwrap_or_default().to_string(),
                interests,
                followers: id_list(&json["followers"], UserID),
                following: id_list(&json["following"], UserID),
                posts: id_list(&json["posts"], PostID),
                professions: string_list(&json["professions"]).unwrap_or_default(),
                skills: string_list(&json["skills"]).unwrap_or_default(),
                experiences: string_list(&json["experiences"]).unwrap_or_default(),
                about: json["about"].as_str().unwrap_or_default().to_string(),
                created_at,
                updated_at: date(&json["updatedAt"]).unwrap_or(created_at),
            })
        })
    }

    pub(super) fn store_profile(&self, id: &UserID, profile: &Profile) -> io::Result<()> {
        self.write_document(PROFILES_PATH, id.as_str(), object! {
            username: profile.username.as_str(),
            "profilePicture": profile.profile_picture.as_str(),
            interests: profile.interests.iter().map(String::as_str).collect::<Vec<_>>(),
            followers: ids_json(profile.followers.iter().map(|x| &x.0)),
            following: ids_json(profile.following.iter().map(|x| &x.0)),
            posts: ids_json(profile.posts.iter().map(|x| &x.0)),
            professions: profile.professions.iter().map(String::as_str).collect::<Vec<_>>(),
            skills: profile.skills.iter().map(String::as_str).collect::<Vec<_>>(),
            experiences: profile.experiences.iter().map(String::as_str).collect::<Vec<_>>(),
            about: profile.about.as_str(),
            "createdAt": date_json(&profile.created_at),
            "updatedAt": date_json(&profile.updated_at),
        })
    }

    pub(super) fn load_posts(&self) -> HashMap<PostID, Post> {
        self.load(POSTS_PATH, PostID, |id, json| {
            let created_at = date_field(json, "createdAt")?;
            let comments: Vec<_> = json["comments"].members().filter_map(|c| {
                Some(Comment {
                    id: CommentID(c["id"].as_str()?.to_string()),
                    author: UserID(c["author"].as_str()?.to_string()),
                    text: c["text"].as_str()?.to_string(),
                    created_at: date(&c["createdAt"])?,
                })
            }).collect();
            if comments.len() < json["comments"].len() {
                warn!("Post {id} has {} malformed comments", json["comments"].len() - comments.len());
            }
            Ok(Post {
                author: UserID(text(json, "author")?.to_string()),
                content: text(json, "content")?.to_string(),
                caption: json["caption"].as_str().unwrap_or_default().to_string(),
                titles: string_list(&json["titles"]).unwrap_or_default(),
                media: string_list(&json["media"]).unwrap_or_default(),
                likes: id_list(&json["likes"], UserID),
                saved_by: id_list(&json["savedBy"], UserID),
                comments,
                created_at,
                updated_at: date(&json["updatedAt"]).unwrap_or(created_at),
            })
        })
    }

    pub(super) fn store_post(&self, id: &PostID, post: &Post) -> io::Result<()> {
        let comments = post.comments.iter().map(|c| object! {
            id: c.id.as_str(),
            author: c.author.as_str(),
            text: c.text.as_str(),
            "createdAt": date_json(&c.created_at),
        }).collect::<Vec<_>>();
        self.write_document(POSTS_PATH, id.as_str(), object! {
            author: post.author.as_str(),
            content: post.content.as_str(),
            caption: post.caption.as_str(),
            titles: post.titles.iter().map(String::as_str).collect::<Vec<_>>(),
            media: post.media.iter().map(String::as_str).collect::<Vec<_>>(),
            likes: ids_json(post.likes.iter().map(|x| &x.0)),
            "savedBy": ids_json(post.saved_by.iter().map(|x| &x.0)),
            comments: comments,
            "createdAt": date_json(&post.created_at),
            "updatedAt": date_json(&post.updated_at),
        })
    }

    pub(super) fn load_opportunities(&self) -> HashMap<OpportunityID, Opportunity> {
        self.load(OPPORTUNITIES_PATH, OpportunityID, |_, json| {
            let created_at = date_field(json, "createdAt")?;
            Ok(Opportunity {
                title: text(json, "title")?.to_string(),
                description: text(json, "description")?.to_string(),
                location: text(json, "location")?.to_string(),
                date: date_field(json, "date")?,
                requirements: json["requirements"].as_str().unwrap_or_default().to_string(),
                created_by: UserID(text(json, "createdBy")?.to_string()),
                created_at,
                updated_at: date(&json["updatedAt"]).unwrap_or(created_at),
            })
        })
    }

    pub(super) fn store_opportunity(&self, id: &OpportunityID, opportunity: &Opportunity) -> io::Result<()> {
        self.write_document(OPPORTUNITIES_PATH, id.as_str(), object! {
            title: opportunity.title.as_str(),
            description: opportunity.description.as_str(),
            location: opportunity.location.as_str(),
            date: date_json(&opportunity.date),
            requirements: opportunity.requirements.as_str(),
            "createdBy": opportunity.created_by.as_str(),
            "createdAt": date_json(&opportunity.created_at),
            "updatedAt": date_json(&opportunity.updated_at),
        })
    }

    pub(super) fn load_portfolios(&self) -> HashMap<UserID, Portfolio> {
        self.load(PORTFOLIOS_PATH, UserID, |id, json| {
            let created_at = date_field(json, "createdAt")?;
            if !json["elements"].is_array() {
                return Err("elements");
            }
            let elements: Vec<_> = json["elements"].members().filter_map(|e| {
                Some(PortfolioElement {
                    id: e["id"].as_str()?.to_string(),
                    kind: ElementKind::parse(e["type"].as_str()?)?,
                    content: e["content"].as_str()?.to_string(),
                    x: e["x"].as_f64()?,
                    y: e["y"].as_f64()?,
                    width: e["width"].as_f64()?,
                    height: e["height"].as_f64()?,
                })
            }).collect();
            if elements.len() < json["elements"].len() {
                warn!("Portfolio {id} has {} malformed elements", json["elements"].len() - elements.len());
            }
            Ok(Portfolio {
                elements,
                created_at,
                updated_at: date(&json["updatedAt"]).unwrap_or(created_at),
            })
        })
    }

    pub(super) fn store_portfolio(&self, user_id: &UserID, portfolio: &Portfolio) -> io::Result<()> {
        let elements = portfolio.elements.iter().map(|e| object! {
            id: e.id.as_str(),
            "type": e.kind.as_str(),
            content: e.content.as_str(),
            x: e.x,
            y: e.y,
            width: e.width,
            height: e.height,
        }).collect::<Vec<_>>();
        self.write_document(PORTFOLIOS_PATH, user_id.as_str(), object! {
            elements: elements,
            "createdAt": date_json(&portfolio.created_at),
            "updatedAt": date_json(&portfolio.updated_at),
        })
    }

    pub(super) fn load_messages(&self) -> HashMap<MessageID, Message> {
        self.load(MESSAGES_PATH, MessageID, |_, json| Ok(Message {
            sender: UserID(text(json, "sender")?.to_string()),
            receiver: UserID(text(json, "receiver")?.to_string()),
            content: json["content"].as_str().map(str::to_string),
            post: json["post"].as_str().map(|x| PostID(x.to_string())),
            created_at: date_field(json, "createdAt")?,
        }))
    }

    pub(super) fn store_message(&self, id: &MessageID, message: &Message) -> io::Result<()> {
        self.write_document(MESSAGES_PATH, id.as_str(), object! {
            sender: message.sender.as_str(),
            receiver: message.receiver.as_str(),
            content: message.content.as_deref(),
            post: message.post.as_ref().map(|x| x.as_str()),
            "createdAt": date_json(&message.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::{Arc, Mutex}};

    use super::*;

    /// Log output collected from a scoped subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        (result, text)
    }

    #[test]
    fn profile_survives_a_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        let mut profile = Profile::new("maya".to_string());
        profile.interests = vec!["Acting".to_string(), "dance".to_string()];
        profile.following = vec![UserID("u2".to_string())];
        store.store_profile(&UserID("u1".to_string()), &profile).unwrap();

        let loaded = store.load_profiles();
        let loaded = &loaded[&UserID("u1".to_string())];
        assert_eq!(loaded.username, "maya");
        assert_eq!(loaded.interests, ["Acting", "dance"]);
        assert_eq!(loaded.following, [UserID("u2".to_string())]);
        assert_eq!(loaded.created_at, profile.created_at);
    }

    #[test]
    fn malformed_interests_load_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        fs::create_dir_all(dir.path().join(PROFILES_PATH)).unwrap();
        fs::write(
            dir.path().join(PROFILES_PATH).join("u1.json"),
            r#"{"username":"x","interests":"acting","createdAt":"2024-01-01T00:00:00Z"}"#,
        ).unwrap();
        let profiles = store.load_profiles();
        assert!(profiles[&UserID("u1".to_string())].interests.is_empty());
    }

    #[test]
    fn unreadable_documents_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        fs::create_dir_all(dir.path().join(POSTS_PATH)).unwrap();
        fs::write(dir.path().join(POSTS_PATH).join("p1.json"), "{oops").unwrap();
        assert!(store.load_posts().is_empty());
        assert!(store.load_accounts().is_empty());
    }

    #[test]
    fn message_without_post_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        let message = Message {
            sender: UserID("a".to_string()),
            receiver: UserID("b".to_string()),
            content: Some("hello".to_string()),
            post: None,
            created_at: Utc::now(),
        };
        let id = store.gen_message_id();
        store.store_message(&id, &message).unwrap();
        let loaded = &store.load_messages()[&id];
        assert_eq!(loaded.content.as_deref(), Some("hello"));
        assert!(loaded.post.is_none());
    }

    #[test]
    fn generated_ids_are_valid() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        let id = store.gen_post_id();
        assert_eq!(id.as_str().len(), ID_LENGTH);
        assert!(crate::data::is_valid_id(id.as_str()));
    }

    #[test]
    fn documents_without_a_creation_date_are_skipped_with_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        let accounts = dir.path().join(ACCOUNTS_PATH);
        fs::create_dir_all(&accounts).unwrap();
        fs::write(accounts.join("ok.json"), r#"{"username":"maya","createdAt":"2024-01-01T00:00:00Z"}"#).unwrap();
        fs::write(accounts.join("undated.json"), r#"{"username":"noor"}"#).unwrap();
        fs::write(accounts.join("garbled.json"), r#"{"username":"ida","createdAt":"last tuesday"}"#).unwrap();

        let (loaded, logs) = with_logs(|| store.load_accounts());
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key(&UserID("ok".to_string())));
        assert!(logs.contains("Skipping accounts document undated: missing or invalid createdAt"), "{logs}");
        assert!(logs.contains("Skipping accounts document garbled: missing or invalid createdAt"), "{logs}");
    }

    #[test]
    fn missing_required_fields_are_named_in_the_warning() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path());
        let posts = dir.path().join(POSTS_PATH);
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("p1.json"), r#"{"content":"hi","createdAt":"2024-01-01T00:00:00Z"}"#).unwrap();

        let (loaded, logs) = with_logs(|| store.load_posts());
        assert!(loaded.is_empty());
        assert!(logs.contains("Skipping posts document p1: missing or invalid author"), "{logs}");
    }
}
