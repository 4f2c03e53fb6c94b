//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PagerConfig;
use crate::consumer::{BuildTriples, GraphEventConsumer, SkipTripleBuild};
use crate::error::{Result, ResultExt};
use crate::model::Triple;
use crate::paging::DeepPagingIterator;
use crate::solr::{SearchClient, SolrClient, SolrQuery};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Triples { format, limit } => self.triples(&config, *format, *limit).await,
            Commands::Count => self.count(&config).await,
        }
    }

    /// Load configuration, applying command line overrides
    pub fn load_config(&self) -> Result<PagerConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PagerConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => PagerConfig::default(),
        };

        if let Some(url) = &self.cli.url {
            config.solr.base_url.clone_from(url);
        }
        if let Some(collection) = &self.cli.collection {
            config.solr.collection.clone_from(collection);
        }
        if let Some(sort) = &self.cli.sort {
            config.sort.clone_from(sort);
        }
        if let Some(rows) = self.cli.rows {
            config.rows = rows;
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the query sent for every page
    pub fn build_query(&self, config: &PagerConfig) -> SolrQuery {
        let mut query = SolrQuery::new(&self.cli.query)
            .with_rows(config.rows)
            .with_sort(&config.sort)
            .with_fields(config.fields.field_list());
        for filter in &self.cli.filters {
            query = query.with_filter_query(filter);
        }
        query
    }

    fn build_iterator(
        &self,
        config: &PagerConfig,
        consumer: Arc<dyn GraphEventConsumer>,
    ) -> Result<DeepPagingIterator> {
        let client: Arc<dyn SearchClient> = Arc::new(SolrClient::new(config.client_config())?);
        let query = self.build_query(config);
        debug!("Query parameters: {:?}", query.params());

        Ok(DeepPagingIterator::new(client, query, consumer).with_fields(config.fields.clone()))
    }

    /// Print triples
    async fn triples(
        &self,
        config: &PagerConfig,
        format: OutputFormat,
        limit: Option<u64>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut iter = self.build_iterator(config, Arc::new(BuildTriples))?;

        let mut emitted = 0u64;
        while limit.map_or(true, |max| emitted < max) && iter.has_next().await? {
            let triple = iter.next_triple()?;
            Self::output_triple(&triple, format);
            emitted += 1;
        }

        info!(
            "Emitted {emitted} triples from {} pages in {:?}",
            iter.pages_fetched(),
            start.elapsed()
        );
        Ok(())
    }

    /// Print the number of matching records
    async fn count(&self, config: &PagerConfig) -> Result<()> {
        let start = Instant::now();
        let iter = self.build_iterator(config, Arc::new(SkipTripleBuild))?;

        let count = iter.count().await?;
        println!("{count}");

        info!("Counted {count} records in {:?}", start.elapsed());
        Ok(())
    }

    fn output_triple(triple: &Triple, format: OutputFormat) {
        match format {
            OutputFormat::Ntriples => println!("{triple}"),
            OutputFormat::Json => {
                let value = json!({
                    "subject": triple.subject.to_string(),
                    "predicate": triple.predicate.to_string(),
                    "object": triple.object.to_string(),
                });
                println!("{value}");
            }
        }
    }
}
