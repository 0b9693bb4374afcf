//! RSS 2.0 channel assembly.

use chrono::{DateTime, Utc};
use dino_store::Post;
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, Item, ItemBuilder};

use crate::metadata::FeedMetadata;

/// Enclosure length written for every item. The store does not track media
/// sizes, so this is a placeholder rather than a measured value.
const ENCLOSURE_LENGTH: &str = "0";

/// An assembled RSS channel ready to be written out.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    channel: Channel,
}

impl FeedDocument {
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    #[must_use]
    pub fn into_channel(self) -> Channel {
        self.channel
    }

    /// Serialize to a complete XML document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, rss::Error> {
        self.channel.write_to(Vec::new())
    }
}

/// Assemble the feed for `posts`, stamped with the current time.
///
/// Items keep the order of `posts`; callers pass them newest first.
#[must_use]
pub fn assemble(metadata: &FeedMetadata, posts: &[Post]) -> FeedDocument {
    assemble_at(metadata, posts, Utc::now())
}

/// Assemble the feed with an explicit `lastBuildDate`.
#[must_use]
pub fn assemble_at(metadata: &FeedMetadata, posts: &[Post], built_at: DateTime<Utc>) -> FeedDocument {
    let items: Vec<Item> = posts.iter().map(|post| post_to_item(metadata, post)).collect();

    let channel = ChannelBuilder::default()
        .title(metadata.title.clone())
        .link(metadata.link.clone())
        .description(metadata.description.clone())
        .last_build_date(built_at.to_rfc2822())
        .generator("dino".to_owned())
        .items(items)
        .build();

    FeedDocument { channel }
}

fn post_to_item(metadata: &FeedMetadata, post: &Post) -> Item {
    let link = metadata.post_url(post.id);

    let enclosure = post.enclosure.as_ref().map(|enclosure| {
        EnclosureBuilder::default()
            .url(enclosure.url.clone())
            .mime_type(enclosure.media_type.clone())
            .length(ENCLOSURE_LENGTH.to_owned())
            .build()
    });

    ItemBuilder::default()
        .title(post.text.clone())
        .description(post.text.clone())
        .link(link.clone())
        .guid(GuidBuilder::default().value(link).permalink(true).build())
        .pub_date(post.created_at.to_rfc2822())
        .enclosure(enclosure)
        .build()
}
