use std::{collections::HashMap, sync::Arc};

use tracing::{error, info};

use super::page::DialogPage;
use crate::{
    definition::{DialogDefinition, PageRecord, record_key},
    error::DialogError,
    services::DialogServices,
};

/// All pages of one dialog definition plus its entry point. Immutable once loaded.
#[derive(Debug)]
pub struct DialogPageGraph {
    name: String,
    default_page: String,
    pages: HashMap<String, Arc<DialogPage>>,
}

impl DialogPageGraph {
    /// Builds every page of `definition`.
    ///
    /// A page that fails to build is logged and left out. A default page that ends up
    /// missing fails the whole graph.
    pub fn load(
        name: impl Into<String>,
        definition: DialogDefinition,
        services: Arc<DialogServices>,
    ) -> Result<Arc<Self>, DialogError> {
        let name = name.into();
        let DialogDefinition {
            default_page,
            pages: records,
        } = definition;

        let graph = Arc::new_cyclic(|weak| {
            let mut pages: HashMap<String, Arc<DialogPage>> = HashMap::new();
            for value in records {
                let key = record_key(&value);
                let built = PageRecord::from_value(value).and_then(|record| {
                    if pages.contains_key(&record.key) {
                        return Err(format!("duplicate page key '{}'", record.key));
                    }
                    DialogPage::from_record(weak.clone(), services.clone(), record)
                });
                match built {
                    Ok(page) => {
                        pages.insert(page.key().to_string(), Arc::new(page));
                    }
                    Err(reason) => {
                        let error = DialogError::InvalidPage {
                            graph: name.clone(),
                            key,
                            reason,
                        };
                        error!("{error}");
                    }
                }
            }

            Self {
                name: name.clone(),
                default_page,
                pages,
            }
        });

        if !graph.pages.contains_key(&graph.default_page) {
            return Err(DialogError::MissingDefaultPage {
                graph: graph.name.clone(),
                key: graph.default_page.clone(),
            });
        }

        info!("dialog '{}' loaded with {} pages", graph.name, graph.pages.len());
        Ok(graph)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_page_key(&self) -> &str {
        &self.default_page
    }

    pub fn default_page(&self) -> Arc<DialogPage> {
        // checked by `load`
        self.pages[&self.default_page].clone()
    }

    pub fn page(&self, key: &str) -> Option<Arc<DialogPage>> {
        self.pages.get(key).cloned()
    }

    /// Like [`Self::page`], but absence is an error naming this graph.
    pub fn resolve(&self, key: &str) -> Result<Arc<DialogPage>, DialogError> {
        self.page(key).ok_or_else(|| DialogError::MissingPage {
            graph: self.name.clone(),
            key: key.to_string(),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
