//! Composite (multi-attribute) partitioning keys.
//!
//! Composite columns and parameters are not part of the catalog. They are synthesized on demand
//! and memoized in a [`CompositeRegistry`], keyed by the sorted list of their bases, so asking
//! twice for the same bases in any order yields the same [`Composite`].

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use derive_more::Display;
use enum_as_inner::EnumAsInner;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::catalog::Named;
use crate::error::{DesignResult, DesignerError};

pub type CompositeBases<K> = SmallVec<[K; 2]>;

#[derive(Clone, Copy, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[display(fmt = "#{}", _0)]
pub struct CompositeId(u32);

/// A synthesized key made of two or more base attributes.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Composite<K> {
    id: CompositeId,
    name: String,
    bases: CompositeBases<K>,
}

impl<K> Composite<K> {
    pub fn id(&self) -> CompositeId {
        self.id
    }

    /// Bases in canonical (sorted) order.
    pub fn bases(&self) -> &[K] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn contains(&self, base: &K) -> bool
    where
        K: PartialEq,
    {
        self.bases.contains(base)
    }
}

impl<K> Named for Composite<K> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<K: Display> Display for Composite<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.bases.iter().join(", "))
    }
}

/// A partitioning attribute: either a catalog entity or a synthesized composite of several.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, EnumAsInner)]
pub enum Attribute<K> {
    Base(K),
    Composite(Composite<K>),
}

impl<K> Attribute<K> {
    /// The base keys behind this attribute.
    pub fn bases(&self) -> &[K] {
        match self {
            Attribute::Base(key) => std::slice::from_ref(key),
            Attribute::Composite(composite) => composite.bases(),
        }
    }
}

impl<K: Named> Named for Attribute<K> {
    fn name(&self) -> &str {
        match self {
            Attribute::Base(key) => key.name(),
            Attribute::Composite(composite) => composite.name(),
        }
    }
}

impl<K: Display> Display for Attribute<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Base(key) => write!(f, "{}", key),
            Attribute::Composite(composite) => write!(f, "{}", composite),
        }
    }
}

impl<K> From<K> for Attribute<K> {
    fn from(key: K) -> Self {
        Attribute::Base(key)
    }
}

struct RegistryInner<K> {
    by_bases: HashMap<CompositeBases<K>, Composite<K>>,
    next_id: u32,
}

/// Memo of every composite created so far.
///
/// Registration is idempotent and order independent, so branches of a parallel search may share
/// one registry; the mutex only serializes id assignment.
pub struct CompositeRegistry<K> {
    inner: Mutex<RegistryInner<K>>,
}

impl<K> Default for CompositeRegistry<K> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                by_bases: HashMap::new(),
                next_id: 0,
            }),
        }
    }
}

impl<K> CompositeRegistry<K>
where
    K: Named + Clone + Ord + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the composite of `first` and `second`, creating it on first request.
    pub fn get_pair(&self, first: &K, second: &K) -> DesignResult<Composite<K>> {
        self.get_or_register([first.clone(), second.clone()])
    }

    /// Returns the composite of `bases`, creating it on first request.
    ///
    /// Duplicate bases are collapsed; fewer than two distinct bases is an error.
    pub fn get_or_register<I>(&self, bases: I) -> DesignResult<Composite<K>>
    where
        I: IntoIterator<Item = K>,
    {
        let canonical = Self::canonicalize(bases);
        if canonical.len() < 2 {
            return Err(DesignerError::InvalidComposite(canonical.len()));
        }

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = inner.by_bases.get(&canonical) {
            return Ok(existing.clone());
        }

        let composite = Composite {
            id: CompositeId(inner.next_id),
            name: canonical.iter().map(|k| k.name()).join("+"),
            bases: canonical.clone(),
        };
        inner.next_id += 1;
        log::trace!("Registered composite {} for {}", composite.id, composite.name);
        inner.by_bases.insert(canonical, composite.clone());
        Ok(composite)
    }

    /// Looks up a composite without registering it.
    pub fn lookup<I>(&self, bases: I) -> Option<Composite<K>>
    where
        I: IntoIterator<Item = K>,
    {
        let canonical = Self::canonicalize(bases);
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.by_bases.get(&canonical).cloned()
    }

    /// Registered composites accepted by `predicate`, in registration order.
    pub fn composites_matching<F>(&self, predicate: F) -> Vec<Composite<K>>
    where
        F: Fn(&Composite<K>) -> bool,
    {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .by_bases
            .values()
            .filter(|c| predicate(c))
            .cloned()
            .sorted_by_key(|c| c.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_bases
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn canonicalize<I>(bases: I) -> CompositeBases<K>
    where
        I: IntoIterator<Item = K>,
    {
        let mut canonical: CompositeBases<K> = bases.into_iter().collect();
        canonical.sort();
        canonical.dedup();
        canonical
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::catalog::{ColumnKey, TableKey};

    fn columns() -> (ColumnKey, ColumnKey, ColumnKey) {
        let t = TableKey::new("orders");
        (t.column("o_id"), t.column("o_d_id"), t.column("o_w_id"))
    }

    #[test]
    fn test_pair_order_independent() {
        let (a, b, _) = columns();
        let registry = CompositeRegistry::new();
        let ab = registry.get_pair(&a, &b).unwrap();
        let ba = registry.get_pair(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.id(), ba.id());
        assert_eq!(1, registry.len());
        assert_eq!("o_d_id+o_id", ab.name());
    }

    #[test]
    fn test_distinct_pairs_get_distinct_ids() {
        let (a, b, c) = columns();
        let registry = CompositeRegistry::new();
        let ab = registry.get_pair(&a, &b).unwrap();
        let ac = registry.get_pair(&a, &c).unwrap();
        assert_ne!(ab.id(), ac.id());
        assert_eq!(Some(ac.clone()), registry.lookup([c.clone(), a.clone()]));
        assert_eq!(None, registry.lookup([b, c]));
    }

    #[test]
    fn test_single_base_rejected() {
        let (a, _, _) = columns();
        let registry = CompositeRegistry::new();
        assert_eq!(
            Err(DesignerError::InvalidComposite(1)),
            registry.get_pair(&a, &a)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_attribute_bases() {
        let (a, b, _) = columns();
        let registry = CompositeRegistry::new();
        let composite = registry.get_pair(&a, &b).unwrap();
        let attr = Attribute::Composite(composite);
        assert!(attr.as_composite().is_some());
        assert_eq!(2, attr.bases().len());
        assert_eq!(vec![a.clone()], Attribute::Base(a).bases().to_vec());
    }

    #[test]
    fn test_concurrent_registration_is_idempotent() {
        let (a, b, _) = columns();
        let registry = Arc::new(CompositeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                let (a, b) = (a.clone(), b.clone());
                thread::spawn(move || {
                    if i % 2 == 0 {
                        registry.get_pair(&a, &b).unwrap()
                    } else {
                        registry.get_pair(&b, &a).unwrap()
                    }
                })
            })
            .collect();
        let ids: Vec<CompositeId> = handles
            .into_iter()
            .map(|h| h.join().unwrap().id())
            .collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(1, registry.len());
    }
}
