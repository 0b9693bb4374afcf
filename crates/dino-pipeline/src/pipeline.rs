//! Pipeline controller.

use std::fs;
use std::path::{Path, PathBuf};

use dino_feed::{FeedMetadata, Renderer, assemble, page_name};
use dino_publish::{Artifact, ArtifactSet, Publisher, content_type_for};
use dino_store::{DEFAULT_WINDOW, Enclosure, Post, PostStore};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::media;
use crate::staging::StagingDir;

/// Construction-time options.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Number of most recent posts materialized on each pass.
    pub window: u32,
    /// Staging directory. `None` creates a temporary one owned by the pipeline.
    pub staging_dir: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            staging_dir: None,
        }
    }
}

/// Step of the current (or last) update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ingesting,
    Materializing,
    Publishing,
    /// The last operation failed. The next call starts a fresh cycle.
    Failed,
}

/// Drives ingest, materialization and publication for one feed.
///
/// The pipeline owns its store and metadata. The publisher is injected; pass
/// a reference to keep ownership with the caller.
pub struct Pipeline<P> {
    store: PostStore,
    metadata: FeedMetadata,
    renderer: Renderer,
    publisher: P,
    staging: StagingDir,
    window: u32,
    /// Media staged since the last successful materialize, oldest first.
    pending_media: Vec<Artifact>,
    phase: Phase,
}

impl<P: Publisher> Pipeline<P> {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Template`] if the metadata template does not
    /// compile, [`PipelineError::InvalidInput`] for a zero window, and
    /// [`PipelineError::Io`] if the staging directory cannot be created.
    pub fn new(
        store: PostStore,
        metadata: FeedMetadata,
        publisher: P,
        options: PipelineOptions,
    ) -> Result<Self, PipelineError> {
        if options.window == 0 {
            return Err(PipelineError::InvalidInput(
                "window must be at least 1".to_owned(),
            ));
        }

        let renderer = Renderer::new(metadata.template.clone())?;
        let staging = match options.staging_dir {
            Some(dir) => StagingDir::existing(dir)?,
            None => StagingDir::temporary()?,
        };

        tracing::debug!(
            staging = %staging.path().display(),
            owned = staging.is_owned(),
            publisher = publisher.name(),
            "Pipeline ready"
        );

        Ok(Self {
            store,
            metadata,
            renderer,
            publisher,
            staging,
            window: options.window,
            pending_media: Vec::new(),
            phase: Phase::Idle,
        })
    }

    #[must_use]
    pub fn store(&self) -> &PostStore {
        &self.store
    }

    #[must_use]
    pub fn metadata(&self) -> &FeedMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    #[must_use]
    pub fn staging_dir(&self) -> &Path {
        self.staging.path()
    }

    /// Whether the staging directory is a temporary one removed on teardown.
    #[must_use]
    pub fn owns_staging_dir(&self) -> bool {
        self.staging.is_owned()
    }

    #[must_use]
    pub fn window(&self) -> u32 {
        self.window
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Store a text post.
    pub async fn ingest(&mut self, text: &str) -> Result<i64, PipelineError> {
        self.phase = Phase::Ingesting;
        let result = self.append(text).await;
        self.finish(result)
    }

    /// Stage `media`, resolve its type, and store a post that encloses it.
    ///
    /// The staged file is included in the next [`Pipeline::materialize`], and
    /// in later ones while its post is in the window and the file is still in
    /// the staging directory.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedMediaType`] if the type cannot be
    /// resolved; the staged file is removed first.
    pub async fn ingest_with_media(
        &mut self,
        text: &str,
        media: &[u8],
        media_type: Option<&str>,
        extension: Option<&str>,
    ) -> Result<i64, PipelineError> {
        self.phase = Phase::Ingesting;
        let result = self.append_with_media(text, media, media_type, extension).await;
        self.finish(result)
    }

    /// Render the recent window and write every artifact to the staging area.
    pub async fn materialize(&mut self) -> Result<ArtifactSet, PipelineError> {
        self.phase = Phase::Materializing;
        let result = self.build_artifacts().await;
        self.finish(result)
    }

    /// Hand an already materialized set to the publisher.
    pub async fn publish(&mut self, artifacts: &ArtifactSet) -> Result<(), PipelineError> {
        self.phase = Phase::Publishing;
        let result = self.hand_off(artifacts).await;
        self.finish(result)
    }

    /// Ingest, materialize and publish a text post.
    ///
    /// # Errors
    ///
    /// On [`PipelineError::Publication`] the post stays stored and the error
    /// carries the materialized artifacts.
    pub async fn update(&mut self, text: &str) -> Result<ArtifactSet, PipelineError> {
        self.phase = Phase::Ingesting;
        let result = match self.append(text).await {
            Ok(_) => self.materialize_and_publish().await,
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    /// Ingest a post with media, then materialize and publish.
    pub async fn update_with_media(
        &mut self,
        text: &str,
        media: &[u8],
        media_type: Option<&str>,
        extension: Option<&str>,
    ) -> Result<ArtifactSet, PipelineError> {
        self.phase = Phase::Ingesting;
        let result = match self.append_with_media(text, media, media_type, extension).await {
            Ok(_) => self.materialize_and_publish().await,
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    /// Close the store (if owned) and remove the staging directory (if owned).
    pub async fn teardown(self) -> Result<(), PipelineError> {
        self.store.close().await;
        let staging_path = self.staging.path().to_path_buf();
        let owned = self.staging.is_owned();
        self.staging.close()?;
        tracing::debug!(staging = %staging_path.display(), removed = owned, "Pipeline torn down");
        Ok(())
    }

    fn finish<T>(&mut self, result: Result<T, PipelineError>) -> Result<T, PipelineError> {
        self.phase = if result.is_ok() {
            Phase::Idle
        } else {
            Phase::Failed
        };
        result
    }

    async fn append(&mut self, text: &str) -> Result<i64, PipelineError> {
        let id = self.store.append(text, None, None).await?;
        tracing::info!(post_id = id, "Stored post");
        Ok(id)
    }

    async fn append_with_media(
        &mut self,
        text: &str,
        media: &[u8],
        media_type: Option<&str>,
        extension: Option<&str>,
    ) -> Result<i64, PipelineError> {
        let stem = Uuid::new_v4().to_string();
        let staged = self.staging.write(&stem, media)?;

        let resolved = match media::resolve(media, media_type, extension) {
            Ok(resolved) => resolved,
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        };

        let file_name = format!("{stem}.{}", resolved.extension);
        let target = staged.with_file_name(&file_name);
        if let Err(e) = fs::rename(&staged, &target) {
            discard(&staged);
            return Err(e.into());
        }

        let enclosure = Enclosure::new(self.metadata.url_for(&file_name), &resolved.media_type);
        let id = match self.store.append_post(text, Some(&enclosure)).await {
            Ok(id) => id,
            Err(e) => {
                discard(&target);
                return Err(e.into());
            }
        };

        tracing::info!(
            post_id = id,
            media = %file_name,
            media_type = %resolved.media_type,
            "Stored post with media"
        );

        self.pending_media
            .push(Artifact::new(file_name, media, resolved.media_type));
        Ok(id)
    }

    async fn materialize_and_publish(&mut self) -> Result<ArtifactSet, PipelineError> {
        self.phase = Phase::Materializing;
        let artifacts = self.build_artifacts().await?;
        self.phase = Phase::Publishing;
        match self.hand_off(&artifacts).await {
            Ok(()) => Ok(artifacts),
            Err(PipelineError::Publication {
                backend, source, ..
            }) => Err(PipelineError::Publication {
                backend,
                source,
                artifacts: Box::new(artifacts),
            }),
            Err(e) => Err(e),
        }
    }

    async fn build_artifacts(&mut self) -> Result<ArtifactSet, PipelineError> {
        let posts = self.store.recent(self.window).await?;

        // Render every page before writing any of them.
        let mut pages = Vec::with_capacity(posts.len());
        for post in &posts {
            let name = page_name(post.id);
            let html = self.renderer.render_post(&self.metadata, post)?;
            let content_type = content_type_for(&name);
            pages.push(Artifact::new(name, html, content_type));
        }

        let media = self.collect_media(&posts)?;

        let feed_name = self.metadata.feed_filename.clone();
        let feed_xml = assemble(&self.metadata, &posts).to_bytes()?;
        let feed_content_type = content_type_for(&feed_name);
        let feed = Artifact::new(feed_name, feed_xml, feed_content_type);

        for artifact in pages.iter().chain(std::iter::once(&feed)) {
            self.staging.write(artifact.name(), artifact.contents())?;
        }

        let mut artifacts = ArtifactSet::new(self.staging.path());
        for artifact in media.into_iter().chain(pages) {
            artifacts.push(artifact);
        }
        artifacts.push(feed);
        self.pending_media.clear();

        tracing::info!(
            posts = posts.len(),
            artifacts = artifacts.len(),
            "Materialized feed"
        );
        Ok(artifacts)
    }

    /// Media to publish with the window: every pending file (newest first),
    /// then staged files referenced by windowed posts.
    fn collect_media(&self, posts: &[Post]) -> Result<Vec<Artifact>, PipelineError> {
        let mut media: Vec<Artifact> = self.pending_media.iter().rev().cloned().collect();

        for post in posts {
            let Some(enclosure) = &post.enclosure else {
                continue;
            };
            let Some(name) = enclosure.url.strip_prefix(&self.metadata.base_url) else {
                continue;
            };
            if name.is_empty() || name.contains('/') || media.iter().any(|a| a.name() == name) {
                continue;
            }
            let path = self.staging.path().join(name);
            if path.is_file() {
                let contents = fs::read(&path)?;
                media.push(Artifact::new(name, contents, enclosure.media_type.as_str()));
            }
        }

        Ok(media)
    }

    async fn hand_off(&self, artifacts: &ArtifactSet) -> Result<(), PipelineError> {
        let backend = self.publisher.name();
        self.publisher
            .publish(artifacts)
            .await
            .map_err(|source| PipelineError::Publication {
                backend,
                source,
                artifacts: Box::new(artifacts.clone()),
            })?;
        tracing::info!(backend, artifacts = artifacts.len(), "Published feed");
        Ok(())
    }
}

/// Remove a staged file, logging instead of failing.
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged media");
    }
}

#[cfg(test)]
mod tests {
    use dino_publish::{LocalPublisher, MemoryPublisher};
    use pretty_assertions::assert_eq;
    use rss::Channel;
    use tempfile::TempDir;

    use super::*;
    use crate::media::fixtures::{GIF, TEXT};

    const BASE_URL: &str = "http://example.com/items/";

    fn metadata() -> FeedMetadata {
        FeedMetadata::new("Dino Test", "http://example.com", "My dino test", BASE_URL)
    }

    async fn pipeline_with<P: Publisher>(
        publisher: P,
        metadata: FeedMetadata,
        options: PipelineOptions,
    ) -> Pipeline<P> {
        let store = PostStore::connect("sqlite::memory:").await.unwrap();
        Pipeline::new(store, metadata, publisher, options).unwrap()
    }

    async fn pipeline<P: Publisher>(publisher: P) -> Pipeline<P> {
        pipeline_with(publisher, metadata(), PipelineOptions::default()).await
    }

    fn feed(artifacts: &ArtifactSet) -> Channel {
        let rss = artifacts.get("rss.xml").unwrap();
        Channel::read_from(rss.contents()).unwrap()
    }

    fn page(artifacts: &ArtifactSet, name: &str) -> String {
        String::from_utf8(artifacts.get(name).unwrap().contents().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_update_produces_pages_and_feed() {
        let publisher = MemoryPublisher::new();
        let mut pipeline = pipeline(&publisher).await;

        pipeline.update("this is a test!").await.unwrap();
        let artifacts = pipeline.update("this is another test!").await.unwrap();

        assert_eq!(artifacts.names(), vec!["2.html", "1.html", "rss.xml"]);

        let channel = feed(&artifacts);
        assert_eq!(channel.title(), "Dino Test");
        assert_eq!(channel.link(), "http://example.com");
        assert_eq!(channel.description(), "My dino test");
        assert_eq!(channel.items().len(), 2);
        assert_eq!(channel.items()[0].title(), Some("this is another test!"));
        assert_eq!(channel.items()[1].title(), Some("this is a test!"));
        assert_eq!(channel.items()[1].description(), Some("this is a test!"));
        assert_eq!(
            channel.items()[1].link(),
            Some("http://example.com/items/1.html")
        );

        assert_eq!(publisher.published().len(), 2);
        assert_eq!(pipeline.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_ingest_a_then_b() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;

        let a = pipeline.ingest("a").await.unwrap();
        pipeline.ingest("b").await.unwrap();

        let posts = pipeline.store().recent(10).await.unwrap();
        let texts: Vec<_> = posts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a"]);

        let artifacts = pipeline.materialize().await.unwrap();
        let channel = feed(&artifacts);
        assert_eq!(channel.items()[0].title(), Some("b"));
        assert_eq!(
            channel.items()[1].link(),
            Some(format!("{BASE_URL}{a}.html").as_str())
        );
    }

    #[tokio::test]
    async fn test_artifacts_are_written_to_staging() {
        let mut pipeline = pipeline(LocalPublisher).await;

        let artifacts = pipeline.update("on disk").await.unwrap();

        for artifact in &artifacts {
            let on_disk = fs::read(artifacts.path_of(artifact)).unwrap();
            assert_eq!(on_disk, artifact.contents());
        }
        assert_eq!(artifacts.root(), pipeline.staging_dir());
    }

    #[tokio::test]
    async fn test_window_excludes_older_posts_but_keeps_them_stored() {
        let options = PipelineOptions {
            window: 3,
            staging_dir: None,
        };
        let mut pipeline = pipeline_with(MemoryPublisher::new(), metadata(), options).await;

        let mut artifacts = pipeline.update("post 1").await.unwrap();
        assert_eq!(feed(&artifacts).items().len(), 1);
        for i in 2..=4 {
            artifacts = pipeline.update(&format!("post {i}")).await.unwrap();
        }

        let titles: Vec<_> = feed(&artifacts)
            .items()
            .iter()
            .map(|i| i.title().unwrap().to_owned())
            .collect();
        assert_eq!(titles, vec!["post 4", "post 3", "post 2"]);
        assert!(artifacts.get("1.html").is_none());
        assert_eq!(pipeline.store().count().await.unwrap(), 4);
        assert!(pipeline.store().get(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_repeated_materialize_is_stable() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;
        pipeline.ingest("a").await.unwrap();
        pipeline.ingest("b").await.unwrap();

        let first = pipeline.materialize().await.unwrap();
        let second = pipeline.materialize().await.unwrap();

        assert_eq!(first.names(), second.names());
        for name in ["1.html", "2.html"] {
            assert_eq!(first.get(name), second.get(name));
        }

        let mut a = feed(&first);
        let mut b = feed(&second);
        a.set_last_build_date(None::<String>);
        b.set_last_build_date(None::<String>);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_update_with_explicit_media_type() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;

        let artifacts = pipeline
            .update_with_media("this is a test!", TEXT, Some("text/plain"), Some("txt"))
            .await
            .unwrap();

        let names = artifacts.names();
        assert!(names.contains(&"1.html"));
        assert!(names.contains(&"rss.xml"));
        let text_files: Vec<_> = artifacts.iter().filter(|a| a.name().ends_with(".txt")).collect();
        assert_eq!(text_files.len(), 1);
        let media = text_files[0];
        assert_eq!(names[0], media.name());
        assert_eq!(media.contents(), TEXT);
        assert_eq!(media.content_type(), "text/plain");
        assert_eq!(fs::read(artifacts.path_of(media)).unwrap(), TEXT);

        let channel = feed(&artifacts);
        let enclosure = channel.items()[0].enclosure().unwrap();
        assert_eq!(enclosure.mime_type(), "text/plain");
        assert_eq!(enclosure.url(), format!("{BASE_URL}{}", media.name()));
    }

    #[tokio::test]
    async fn test_update_with_detected_gif() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;

        let artifacts = pipeline.update_with_media("gif!", GIF, None, None).await.unwrap();

        let media = artifacts.iter().next().unwrap();
        assert!(media.name().ends_with(".gif"));
        assert_eq!(media.content_type(), "image/gif");

        let post = pipeline.store().get(1).await.unwrap().unwrap();
        let enclosure = post.enclosure.unwrap();
        assert_eq!(enclosure.media_type, "image/gif");
        assert!(enclosure.url.ends_with(".gif"));

        assert!(page(&artifacts, "1.html").contains(&format!("<img src=\"{}\">", enclosure.url)));
    }

    #[tokio::test]
    async fn test_windowed_media_is_republished() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;

        let with_media = pipeline.update_with_media("gif!", GIF, None, None).await.unwrap();
        let next = pipeline.update("plain").await.unwrap();

        let media_name = with_media.names()[0].to_owned();
        assert_eq!(with_media.len(), 3);
        assert_eq!(next.names(), vec![media_name.as_str(), "2.html", "1.html", "rss.xml"]);
        assert_eq!(next.get(&media_name).unwrap().contents(), GIF);
        assert_eq!(next.get(&media_name).unwrap().content_type(), "image/gif");
    }

    #[tokio::test]
    async fn test_media_outside_window_is_dropped() {
        let options = PipelineOptions {
            window: 1,
            staging_dir: None,
        };
        let mut pipeline = pipeline_with(MemoryPublisher::new(), metadata(), options).await;

        pipeline.update_with_media("gif!", GIF, None, None).await.unwrap();
        let next = pipeline.update("plain").await.unwrap();

        assert_eq!(next.names(), vec!["2.html", "rss.xml"]);
    }

    #[tokio::test]
    async fn test_every_staged_media_reaches_materialize() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;

        pipeline.ingest_with_media("gif!", GIF, None, None).await.unwrap();
        pipeline
            .ingest_with_media("text!", TEXT, Some("text/plain"), Some("txt"))
            .await
            .unwrap();
        let artifacts = pipeline.materialize().await.unwrap();

        let names = artifacts.names();
        assert_eq!(names.len(), 5);
        assert!(names[0].ends_with(".txt"));
        assert!(names[1].ends_with(".gif"));
        assert_eq!(&names[2..], ["2.html", "1.html", "rss.xml"]);

        let first = pipeline.store().get(1).await.unwrap().unwrap();
        let enclosure_url = first.enclosure.unwrap().url;
        assert_eq!(enclosure_url, format!("{BASE_URL}{}", names[1]));
    }

    #[tokio::test]
    async fn test_pending_media_outside_window_is_still_published() {
        let options = PipelineOptions {
            window: 1,
            staging_dir: None,
        };
        let mut pipeline = pipeline_with(MemoryPublisher::new(), metadata(), options).await;

        pipeline.ingest_with_media("gif!", GIF, None, None).await.unwrap();
        pipeline
            .ingest_with_media("png!", crate::media::fixtures::PNG, None, None)
            .await
            .unwrap();
        let artifacts = pipeline.materialize().await.unwrap();

        let names = artifacts.names();
        assert!(names[0].ends_with(".png"));
        assert!(names[1].ends_with(".gif"));
        assert_eq!(&names[2..], ["2.html", "rss.xml"]);
    }

    #[tokio::test]
    async fn test_media_recovered_from_staging_after_failed_publish() {
        let staging = TempDir::new().unwrap();
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let options = || PipelineOptions {
            window: DEFAULT_WINDOW,
            staging_dir: Some(staging.path().to_path_buf()),
        };

        let failing = MemoryPublisher::failing();
        let store = PostStore::with_pool(pool.clone()).await.unwrap();
        let mut first = Pipeline::new(store, metadata(), &failing, options()).unwrap();
        let err = first.update_with_media("gif!", GIF, None, None).await.unwrap_err();
        assert!(matches!(err, PipelineError::Publication { .. }));
        first.teardown().await.unwrap();

        let publisher = MemoryPublisher::new();
        let store = PostStore::with_pool(pool.clone()).await.unwrap();
        let mut second = Pipeline::new(store, metadata(), &publisher, options()).unwrap();
        let artifacts = second.materialize().await.unwrap();
        second.publish(&artifacts).await.unwrap();

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert!(published[0][0].ends_with(".gif"));
        assert_eq!(&published[0][1..], ["1.html".to_owned(), "rss.xml".to_owned()]);
    }

    #[tokio::test]
    async fn test_unsupported_media_is_cleaned_up() {
        let staging = TempDir::new().unwrap();
        let options = PipelineOptions {
            window: DEFAULT_WINDOW,
            staging_dir: Some(staging.path().to_path_buf()),
        };
        let mut pipeline = pipeline_with(MemoryPublisher::new(), metadata(), options).await;

        let err = pipeline
            .update_with_media("mystery", TEXT, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::UnsupportedMediaType(_)));
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
        assert_eq!(pipeline.store().count().await.unwrap(), 0);
        assert_eq!(pipeline.phase(), Phase::Failed);
    }

    #[tokio::test]
    async fn test_override_template_is_literal() {
        let literal = "<html>whatever</html>";
        let mut pipeline = pipeline_with(
            MemoryPublisher::new(),
            metadata().with_template(literal),
            PipelineOptions::default(),
        )
        .await;

        pipeline.ingest("one").await.unwrap();
        let artifacts = pipeline.update("two").await.unwrap();

        assert_eq!(page(&artifacts, "1.html"), literal);
        assert_eq!(page(&artifacts, "2.html"), literal);
    }

    #[tokio::test]
    async fn test_default_template_marker() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;

        let artifacts = pipeline.update("this is a test!").await.unwrap();

        assert!(page(&artifacts, "1.html").contains("<!-- dino default html template -->"));
    }

    #[tokio::test]
    async fn test_undefined_template_variable_aborts_materialize() {
        let staging = TempDir::new().unwrap();
        let options = PipelineOptions {
            window: DEFAULT_WINDOW,
            staging_dir: Some(staging.path().to_path_buf()),
        };
        let publisher = MemoryPublisher::new();
        let mut pipeline =
            pipeline_with(&publisher, metadata().with_template("{{ nope }}"), options).await;

        let err = pipeline.update("hello").await.unwrap_err();

        assert!(matches!(err, PipelineError::Template(_)));
        assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
        assert!(publisher.published().is_empty());
        assert_eq!(pipeline.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_publication_failure_keeps_post_and_returns_artifacts() {
        let publisher = MemoryPublisher::failing();
        let mut pipeline = pipeline(&publisher).await;

        let err = pipeline.update("keep me").await.unwrap_err();

        let (backend, artifacts) = match err {
            PipelineError::Publication {
                backend, artifacts, ..
            } => (backend, artifacts),
            other => panic!("expected publication error, got {other:?}"),
        };
        assert_eq!(backend, "memory");
        assert_eq!(artifacts.names(), vec!["1.html", "rss.xml"]);
        assert_eq!(pipeline.store().count().await.unwrap(), 1);
        assert_eq!(pipeline.phase(), Phase::Failed);

        publisher.set_failing(false);
        pipeline.publish(&artifacts).await.unwrap();
        assert_eq!(publisher.published(), vec![vec!["1.html".to_owned(), "rss.xml".to_owned()]]);
        assert_eq!(pipeline.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_custom_feed_filename() {
        let mut pipeline = pipeline_with(
            MemoryPublisher::new(),
            metadata().with_feed_filename("feed.xml"),
            PipelineOptions::default(),
        )
        .await;

        let artifacts = pipeline.update("hi").await.unwrap();

        assert_eq!(artifacts.names(), vec!["1.html", "feed.xml"]);
        assert!(page(&artifacts, "1.html").contains("http://example.com/items/feed.xml"));
    }

    #[tokio::test]
    async fn test_zero_window_is_rejected() {
        let store = PostStore::connect("sqlite::memory:").await.unwrap();
        let options = PipelineOptions {
            window: 0,
            staging_dir: None,
        };

        let result = Pipeline::new(store, metadata(), MemoryPublisher::new(), options);

        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_teardown_removes_owned_staging() {
        let mut pipeline = pipeline(MemoryPublisher::new()).await;
        pipeline.update("bye").await.unwrap();
        let staging = pipeline.staging_dir().to_path_buf();

        pipeline.teardown().await.unwrap();

        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_teardown_keeps_supplied_staging_and_pool() {
        let staging = TempDir::new().unwrap();
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = PostStore::with_pool(pool.clone()).await.unwrap();
        let options = PipelineOptions {
            window: DEFAULT_WINDOW,
            staging_dir: Some(staging.path().to_path_buf()),
        };
        let mut pipeline = Pipeline::new(store, metadata(), LocalPublisher, options).unwrap();

        pipeline.update("stay").await.unwrap();
        pipeline.teardown().await.unwrap();

        assert!(staging.path().join("1.html").is_file());
        assert!(staging.path().join("rss.xml").is_file());
        assert!(!pool.is_closed());
    }
}
