//! Locale-bound message accessors.
//!
//! Generated message contracts describe each accessor method with a static
//! [`MessageMethod`] (message key plus ordered argument names). At use time a
//! contract is bound to a locale: [`MessageBundles::get`] loads the resource
//! bundle once per `(contract, locale)` and hands out the shared
//! [`BoundMessages`] to every later caller.

use crate::bundle::{BundleError, BundleSource, DirectorySource, Locale, ResourceBundle};
use crate::format::{IcuFormatter, MessageArg, MessageFormatter, NamedArgs};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, OnceLock};

/// Static description of one accessor method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageMethod {
    /// Accessor name in the generated contract.
    pub name: &'static str,
    /// Key in the resource bundle.
    pub key: &'static str,
    /// Argument names, in parameter order.
    pub args: &'static [&'static str],
}

/// A generated message contract.
pub trait MessageContract: 'static {
    /// Bundle base name, e.g. `messages` for `messages_en.properties`.
    const BASE_NAME: &'static str;

    fn methods() -> &'static [MessageMethod];
}

/// A contract bound to one locale's resource bundle.
pub struct BoundMessages<C> {
    bundle: ResourceBundle,
    dispatch: HashMap<&'static str, &'static MessageMethod>,
    formatter: Arc<dyn MessageFormatter>,
    contract: PhantomData<fn() -> C>,
}

impl<C: MessageContract> BoundMessages<C> {
    pub fn new(bundle: ResourceBundle, formatter: Arc<dyn MessageFormatter>) -> Self {
        let dispatch = C::methods().iter().map(|m| (m.name, m)).collect();
        Self {
            bundle,
            dispatch,
            formatter,
            contract: PhantomData,
        }
    }

    pub fn locale(&self) -> &Locale {
        self.bundle.locale()
    }

    /// Render the message behind accessor `method`.
    ///
    /// # Panics
    ///
    /// When `method` has no descriptor in the contract. Generated accessors
    /// always pass their own name, so this only fires on a broken contract.
    pub fn format(&self, method: &str, args: Vec<MessageArg>) -> String {
        let Some(descriptor) = self.dispatch.get(method) else {
            panic!(
                "message contract violation: {} has no message metadata for `{method}`",
                std::any::type_name::<C>()
            );
        };

        let Some(template) = self.bundle.get(descriptor.key) else {
            tracing::error!(
                key = descriptor.key,
                locale = %self.bundle.locale(),
                bundle = C::BASE_NAME,
                "message key missing from bundle"
            );
            return descriptor.key.to_string();
        };

        if descriptor.args.is_empty() {
            return template.to_string();
        }

        debug_assert_eq!(descriptor.args.len(), args.len(), "arity of `{method}`");
        let named: NamedArgs = descriptor
            .args
            .iter()
            .map(|name| name.to_string())
            .zip(args)
            .collect();
        self.formatter.format(template, self.bundle.locale(), &named)
    }
}

type Cell = Arc<OnceLock<Result<Arc<dyn Any + Send + Sync>, BundleError>>>;

/// Cache of bound contracts keyed by `(contract type, locale)`.
///
/// Construction runs at most once per key, even when several threads ask
/// for the same key at the same time; the others wait for the first and
/// receive the same instance. A failed load is cached as well.
pub struct MessageBundles {
    source: Arc<dyn BundleSource>,
    formatter: Arc<dyn MessageFormatter>,
    cells: Mutex<HashMap<(TypeId, Locale), Cell>>,
}

static GLOBAL: OnceLock<MessageBundles> = OnceLock::new();

impl MessageBundles {
    pub fn new(source: impl BundleSource + 'static) -> Self {
        Self::with_formatter(source, IcuFormatter::new())
    }

    pub fn with_formatter(
        source: impl BundleSource + 'static,
        formatter: impl MessageFormatter + 'static,
    ) -> Self {
        Self {
            source: Arc::new(source),
            formatter: Arc::new(formatter),
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Install the process-wide cache. Returns `false` if one already exists.
    pub fn install_global(bundles: MessageBundles) -> bool {
        GLOBAL.set(bundles).is_ok()
    }

    /// The process-wide cache, reading bundles from the working directory
    /// unless another one was installed first.
    pub fn global() -> &'static MessageBundles {
        GLOBAL.get_or_init(|| MessageBundles::new(DirectorySource::new(".")))
    }

    /// Get `C` bound to `locale`, building it on first use.
    pub fn get<C>(&self, locale: &Locale) -> Result<Arc<BoundMessages<C>>, BundleError>
    where
        C: MessageContract,
    {
        let cell = {
            let mut cells = self.cells.lock().unwrap();
            Arc::clone(
                cells
                    .entry((TypeId::of::<C>(), locale.clone()))
                    .or_default(),
            )
        };

        let built = cell.get_or_init(|| {
            tracing::debug!(contract = std::any::type_name::<C>(), %locale, "binding message contract");
            ResourceBundle::load(self.source.as_ref(), C::BASE_NAME, locale).map(|bundle| {
                Arc::new(BoundMessages::<C>::new(bundle, Arc::clone(&self.formatter)))
                    as Arc<dyn Any + Send + Sync>
            })
        });

        match built {
            Ok(any) => Ok(Arc::clone(any)
                .downcast::<BoundMessages<C>>()
                .unwrap_or_else(|_| unreachable!("cache entries are keyed by contract type"))),
            Err(err) => Err(err.clone()),
        }
    }

    /// Number of `(contract, locale)` pairs requested so far.
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
