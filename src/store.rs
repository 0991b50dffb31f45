use std::collections::{HashMap, HashSet, VecDeque};
use std::str;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{Mutex, MutexGuard};

/// Number of independent databases held by the server.
pub const NUM_DATABASES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    String,
    List,
    Set,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
        }
    }
}

/// One logical database: three typed maps plus the type index.
///
/// Invariants, enforced by every mutating method:
/// - a key is present in the type index iff it is present in exactly one of
///   the typed maps, and the index entry names that map;
/// - no list or set value is ever empty.
#[derive(Default)]
pub struct Db {
    strings: HashMap<Bytes, Bytes>,
    lists: HashMap<Bytes, VecDeque<Bytes>>,
    sets: HashMap<Bytes, HashSet<Bytes>>,
    types: HashMap<Bytes, KeyType>,
}

impl Db {
    pub fn key_type(&self, key: &[u8]) -> Option<KeyType> {
        self.types.get(key).copied()
    }

    /// Number of keys, counted from the type index.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Stores `key -> value` as a string, replacing any previous entry
    /// regardless of its type.
    pub fn set(&mut self, key: Bytes, value: Bytes) {
        self.remove(&key);
        self.types.insert(key.clone(), KeyType::String);
        self.strings.insert(key, value);
    }

    pub fn get(&self, key: &[u8]) -> Option<&Bytes> {
        self.strings.get(key)
    }

    /// Removes `key` no matter its type. Returns whether it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let Some(typ) = self.types.remove(key) else {
            return false;
        };
        match typ {
            KeyType::String => self.strings.remove(key).is_some(),
            KeyType::List => self.lists.remove(key).is_some(),
            KeyType::Set => self.sets.remove(key).is_some(),
        }
    }

    /// Adds `delta` to the integer stored at `key`. A missing key is created
    /// holding `missing` (its decimal text) and `missing` is returned.
    /// `None` means the stored value does not parse as a signed integer or
    /// the addition overflowed.
    pub fn increment(&mut self, key: &Bytes, delta: i64, missing: i64) -> Option<i64> {
        let current = match self.strings.get(&key[..]) {
            None => {
                self.set(key.clone(), Bytes::from(missing.to_string()));
                return Some(missing);
            }
            Some(value) => str::from_utf8(value).ok()?.parse::<i64>().ok()?,
        };

        let updated = current.checked_add(delta)?;
        self.set(key.clone(), Bytes::from(updated.to_string()));
        Some(updated)
    }

    /// Keys of the current database matching a shell glob, byte-sorted.
    pub fn keys_matching(&self, pattern: &str) -> Result<Vec<Bytes>, glob::PatternError> {
        let pattern = glob::Pattern::new(pattern)?;
        let mut keys: Vec<Bytes> = self
            .types
            .keys()
            .filter(|key| pattern.matches(&String::from_utf8_lossy(key)))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    pub fn random_key(&self) -> Option<Bytes> {
        self.types.keys().next().cloned()
    }

    /// Moves the entry at `src` to `dst`, overwriting whatever `dst` held,
    /// regardless of either type. A missing `src` is a no-op.
    pub fn rename(&mut self, src: &[u8], dst: Bytes) {
        let Some(typ) = self.types.get(src).copied() else {
            return;
        };
        self.remove(&dst);
        match typ {
            KeyType::String => {
                if let Some(value) = self.strings.remove(src) {
                    self.strings.insert(dst.clone(), value);
                }
            }
            KeyType::List => {
                if let Some(value) = self.lists.remove(src) {
                    self.lists.insert(dst.clone(), value);
                }
            }
            KeyType::Set => {
                if let Some(value) = self.sets.remove(src) {
                    self.sets.insert(dst.clone(), value);
                }
            }
        }
        self.types.remove(src);
        self.types.insert(dst, typ);
    }

    /// Prepends to the list at `key`, creating it if absent. Returns the new
    /// length. Callers guard against non-list keys.
    pub fn lpush(&mut self, key: Bytes, value: Bytes) -> usize {
        self.types.insert(key.clone(), KeyType::List);
        let list = self.lists.entry(key).or_default();
        list.push_front(value);
        list.len()
    }

    pub fn rpush(&mut self, key: Bytes, value: Bytes) -> usize {
        self.types.insert(key.clone(), KeyType::List);
        let list = self.lists.entry(key).or_default();
        list.push_back(value);
        list.len()
    }

    pub fn llen(&self, key: &[u8]) -> usize {
        self.lists.get(key).map_or(0, VecDeque::len)
    }

    /// Elements with index in `[start', end']` inclusive. A negative start
    /// counts as its absolute value; a negative end is size-relative.
    pub fn lrange(&self, key: &[u8], start: i64, end: i64) -> Vec<Bytes> {
        let Some(list) = self.lists.get(key) else {
            return Vec::new();
        };
        let (start, end) = normalize_range(start, end, list.len());
        if start > end {
            return Vec::new();
        }
        list.iter()
            .enumerate()
            .filter(|(i, _)| {
                let i = *i as i64;
                i >= start && i <= end
            })
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub fn lindex(&self, key: &[u8], index: i64) -> Option<Bytes> {
        let list = self.lists.get(key)?;
        let index = if index < 0 {
            list.len() as i64 + index
        } else {
            index
        };
        if index < 0 {
            return None;
        }
        list.get(index as usize).cloned()
    }

    pub fn lpop(&mut self, key: &[u8]) -> Option<Bytes> {
        let list = self.lists.get_mut(key)?;
        let value = list.pop_front();
        if list.is_empty() {
            self.lists.remove(key);
            self.types.remove(key);
        }
        value
    }

    pub fn rpop(&mut self, key: &[u8]) -> Option<Bytes> {
        let list = self.lists.get_mut(key)?;
        let value = list.pop_back();
        if list.is_empty() {
            self.lists.remove(key);
            self.types.remove(key);
        }
        value
    }

    /// Keeps only the elements with index in `[start', end']` (same
    /// normalization as `lrange`). Returns false when the range is inverted,
    /// in which case the key is deleted outright.
    pub fn ltrim(&mut self, key: &[u8], start: i64, end: i64) -> bool {
        let Some(list) = self.lists.get_mut(key) else {
            return false;
        };
        let (start, end) = normalize_range(start, end, list.len());
        if start > end {
            self.lists.remove(key);
            self.types.remove(key);
            return false;
        }
        let mut index: i64 = -1;
        list.retain(|_| {
            index += 1;
            index >= start && index <= end
        });
        if list.is_empty() {
            self.lists.remove(key);
            self.types.remove(key);
        }
        true
    }

    /// Replaces the element at `index`. False when the index is out of range.
    pub fn lset(&mut self, key: &[u8], index: i64, value: Bytes) -> bool {
        let Some(list) = self.lists.get_mut(key) else {
            return false;
        };
        if index < 0 {
            return false;
        }
        match list.get_mut(index as usize) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Removes elements equal to `value`: from the head up to `count` when
    /// positive, from the tail up to `|count|` when negative, all of them
    /// when zero. Returns the number removed.
    pub fn lrem(&mut self, key: &[u8], count: i64, value: &[u8]) -> usize {
        let Some(list) = self.lists.get_mut(key) else {
            return 0;
        };
        let mut removed = 0;
        if count > 0 {
            let mut index = 0;
            while index < list.len() && removed < count as usize {
                if &list[index][..] == value {
                    list.remove(index);
                    removed += 1;
                } else {
                    index += 1;
                }
            }
        } else if count < 0 {
            let limit = count.unsigned_abs() as usize;
            let mut index = list.len();
            while index > 0 && removed < limit {
                index -= 1;
                if &list[index][..] == value {
                    list.remove(index);
                    removed += 1;
                }
            }
        } else {
            let before = list.len();
            list.retain(|element| &element[..] != value);
            removed = before - list.len();
        }
        if list.is_empty() {
            self.lists.remove(key);
            self.types.remove(key);
        }
        removed
    }

    /// Adds `member` to the set at `key`, creating it if absent. Returns
    /// whether the member was newly added. Callers guard non-set keys.
    pub fn sadd(&mut self, key: Bytes, member: Bytes) -> bool {
        self.types.insert(key.clone(), KeyType::Set);
        self.sets.entry(key).or_default().insert(member)
    }

    pub fn srem(&mut self, key: &[u8], member: &[u8]) -> bool {
        let Some(set) = self.sets.get_mut(key) else {
            return false;
        };
        let removed = set.remove(member);
        if set.is_empty() {
            self.sets.remove(key);
            self.types.remove(key);
        }
        removed
    }

    pub fn scard(&self, key: &[u8]) -> usize {
        self.sets.get(key).map_or(0, HashSet::len)
    }

    pub fn sismember(&self, key: &[u8], member: &[u8]) -> bool {
        self.sets.get(key).is_some_and(|set| set.contains(member))
    }

    /// Byte-sorted members, or `None` when `key` holds no set.
    pub fn smembers(&self, key: &[u8]) -> Option<Vec<Bytes>> {
        let set = self.sets.get(key)?;
        let mut members: Vec<Bytes> = set.iter().cloned().collect();
        members.sort();
        Some(members)
    }

    /// Byte-sorted members present in every named set.
    pub fn sinter(&self, keys: &[Bytes]) -> Vec<Bytes> {
        let mut counts: HashMap<Bytes, usize> = HashMap::new();
        for key in keys {
            if let Some(set) = self.sets.get(&key[..]) {
                for member in set {
                    *counts.entry(member.clone()).or_insert(0) += 1;
                }
            }
        }
        let mut members: Vec<Bytes> = counts
            .into_iter()
            .filter(|(_, count)| *count == keys.len())
            .map(|(member, _)| member)
            .collect();
        members.sort();
        members
    }

    /// Replaces whatever `key` held with the given set members. An empty
    /// member list leaves the key absent.
    pub fn store_set(&mut self, key: Bytes, members: Vec<Bytes>) {
        self.remove(&key);
        if members.is_empty() {
            return;
        }
        self.types.insert(key.clone(), KeyType::Set);
        self.sets.insert(key, members.into_iter().collect());
    }

    /// Approximate resident bytes: keys plus stored payloads.
    pub fn used_memory(&self) -> usize {
        let strings: usize = self
            .strings
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum();
        let lists: usize = self
            .lists
            .iter()
            .map(|(key, list)| key.len() + list.iter().map(Bytes::len).sum::<usize>())
            .sum();
        let sets: usize = self
            .sets
            .iter()
            .map(|(key, set)| key.len() + set.iter().map(Bytes::len).sum::<usize>())
            .sum();
        strings + lists + sets
    }

    pub fn type_entries(&self) -> impl Iterator<Item = (&Bytes, KeyType)> {
        self.types.iter().map(|(key, typ)| (key, *typ))
    }

    pub fn string_entries(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.strings.iter()
    }

    pub fn set_entries(&self) -> impl Iterator<Item = (&Bytes, &HashSet<Bytes>)> {
        self.sets.iter()
    }

    pub fn list_entries(&self) -> impl Iterator<Item = (&Bytes, &VecDeque<Bytes>)> {
        self.lists.iter()
    }
}

/// The database array. Owned exclusively by the engine; accessed through
/// the store handle's mutex.
pub struct StoreInner {
    dbs: Vec<Db>,
}

impl StoreInner {
    fn new() -> StoreInner {
        StoreInner {
            dbs: (0..NUM_DATABASES).map(|_| Db::default()).collect(),
        }
    }

    pub fn db(&self, index: usize) -> &Db {
        &self.dbs[index]
    }

    pub fn db_mut(&mut self, index: usize) -> &mut Db {
        &mut self.dbs[index]
    }

    pub fn databases(&self) -> impl Iterator<Item = &Db> {
        self.dbs.iter()
    }

    pub fn flush_db(&mut self, index: usize) {
        self.dbs[index] = Db::default();
    }

    pub fn flush_all(&mut self) {
        for db in &mut self.dbs {
            *db = Db::default();
        }
    }

    pub fn used_memory(&self) -> usize {
        self.dbs.iter().map(Db::used_memory).sum()
    }

    /// Moves `key` from one database to another. False when the key is
    /// absent from the source or already present in the target.
    pub fn move_key(&mut self, from: usize, to: usize, key: &[u8]) -> bool {
        if from == to {
            return false;
        }
        let (src, dst) = if from < to {
            let (left, right) = self.dbs.split_at_mut(to);
            (&mut left[from], &mut right[0])
        } else {
            let (left, right) = self.dbs.split_at_mut(from);
            (&mut right[0], &mut left[to])
        };

        let Some(typ) = src.types.get(key).copied() else {
            return false;
        };
        if dst.types.contains_key(key) {
            return false;
        }

        match typ {
            KeyType::String => {
                if let Some((key, value)) = src.strings.remove_entry(key) {
                    dst.strings.insert(key, value);
                }
            }
            KeyType::List => {
                if let Some((key, value)) = src.lists.remove_entry(key) {
                    dst.lists.insert(key, value);
                }
            }
            KeyType::Set => {
                if let Some((key, value)) = src.sets.remove_entry(key) {
                    dst.sets.insert(key, value);
                }
            }
        }

        if let Some((key, typ)) = src.types.remove_entry(key) {
            dst.types.insert(key, typ);
        }
        true
    }
}

fn normalize_range(start: i64, end: i64, size: usize) -> (i64, i64) {
    let start = if start < 0 { -start } else { start };
    let end = if end < 0 { size as i64 + end } else { end };
    (start, end)
}

/// Cloneable handle to the engine. All operations go through `lock`, the
/// process-wide serialization point.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Store {
    pub fn new() -> Store {
        Store {
            inner: Arc::new(Mutex::new(StoreInner::new())),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    fn assert_index_consistent(db: &Db) {
        for (key, typ) in db.types.iter() {
            let in_strings = db.strings.contains_key(key);
            let in_lists = db.lists.contains_key(key);
            let in_sets = db.sets.contains_key(key);
            let count = in_strings as usize + in_lists as usize + in_sets as usize;
            assert_eq!(count, 1, "key {:?} present in {} typed maps", key, count);
            match typ {
                KeyType::String => assert!(in_strings),
                KeyType::List => assert!(in_lists),
                KeyType::Set => assert!(in_sets),
            }
        }
        assert_eq!(
            db.types.len(),
            db.strings.len() + db.lists.len() + db.sets.len()
        );
        assert!(db.lists.values().all(|list| !list.is_empty()));
        assert!(db.sets.values().all(|set| !set.is_empty()));
    }

    #[test]
    fn set_overwrites_any_type() {
        let mut db = Db::default();
        db.lpush(b("k"), b("element"));
        db.set(b("k"), b("value"));

        assert_eq!(db.key_type(b"k"), Some(KeyType::String));
        assert_eq!(db.get(b"k"), Some(&b("value")));
        assert_eq!(db.llen(b"k"), 0);
        assert_index_consistent(&db);
    }

    #[test]
    fn remove_clears_index_and_map() {
        let mut db = Db::default();
        db.sadd(b("k"), b("m"));

        assert!(db.remove(b"k"));
        assert!(!db.remove(b"k"));
        assert_eq!(db.key_type(b"k"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn pop_of_last_element_deletes_key() {
        let mut db = Db::default();
        db.rpush(b("k"), b("only"));

        assert_eq!(db.lpop(b"k"), Some(b("only")));
        assert_eq!(db.key_type(b"k"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn srem_of_last_member_deletes_key() {
        let mut db = Db::default();
        db.sadd(b("k"), b("m"));

        assert!(db.srem(b"k", b"m"));
        assert_eq!(db.key_type(b"k"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn lrange_with_negative_bounds() {
        let mut db = Db::default();
        db.rpush(b("k"), b("a"));
        db.rpush(b("k"), b("b"));
        db.rpush(b("k"), b("c"));

        // end -1 resolves to the last element
        assert_eq!(db.lrange(b"k", 0, -1), vec![b("a"), b("b"), b("c")]);
        // a negative start counts as its absolute value
        assert_eq!(db.lrange(b"k", -1, 2), vec![b("b"), b("c")]);
        assert_eq!(db.lrange(b"k", 2, 1), Vec::<Bytes>::new());
    }

    #[test]
    fn ltrim_inverted_range_deletes_key() {
        let mut db = Db::default();
        db.rpush(b("k"), b("a"));
        db.rpush(b("k"), b("b"));

        assert!(!db.ltrim(b"k", 100, 0));
        assert_eq!(db.key_type(b"k"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn ltrim_keeps_inclusive_range() {
        let mut db = Db::default();
        for element in ["a", "b", "c", "d"] {
            db.rpush(b("k"), b(element));
        }

        assert!(db.ltrim(b"k", 1, 2));
        assert_eq!(db.lrange(b"k", 0, -1), vec![b("b"), b("c")]);
        assert_index_consistent(&db);
    }

    #[test]
    fn ltrim_past_the_end_deletes_key() {
        let mut db = Db::default();
        db.rpush(b("k"), b("a"));

        // 5..=9 selects nothing; the emptied list must not linger
        assert!(db.ltrim(b"k", 5, 9));
        assert_eq!(db.key_type(b"k"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn lrem_head_tail_and_all() {
        let mut db = Db::default();
        for element in ["x", "y", "x", "y", "x"] {
            db.rpush(b("k"), b(element));
        }

        assert_eq!(db.lrem(b"k", 1, b"x"), 1);
        assert_eq!(db.lrange(b"k", 0, -1), vec![b("y"), b("x"), b("y"), b("x")]);

        assert_eq!(db.lrem(b"k", -1, b"x"), 1);
        assert_eq!(db.lrange(b"k", 0, -1), vec![b("y"), b("x"), b("y")]);

        assert_eq!(db.lrem(b"k", 0, b"y"), 2);
        assert_eq!(db.lrange(b"k", 0, -1), vec![b("x")]);

        assert_eq!(db.lrem(b"k", 0, b"x"), 1);
        assert_eq!(db.key_type(b"k"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn lset_replaces_in_place() {
        let mut db = Db::default();
        db.rpush(b("k"), b("a"));
        db.rpush(b("k"), b("b"));

        assert!(db.lset(b"k", 1, b("B")));
        assert_eq!(db.lrange(b"k", 0, -1), vec![b("a"), b("B")]);
        assert!(!db.lset(b"k", 2, b("C")));
        assert!(!db.lset(b"k", -1, b("C")));
    }

    #[test]
    fn increment_semantics() {
        let mut db = Db::default();

        // a missing key is created holding the `missing` value itself
        assert_eq!(db.increment(&b("counter"), 1, 0), Some(0));
        assert_eq!(db.increment(&b("counter"), 1, 0), Some(1));
        assert_eq!(db.get(b"counter"), Some(&b("1")));

        db.set(b("text"), b("not-a-number"));
        assert_eq!(db.increment(&b("text"), 1, 0), None);

        db.set(b("big"), b("9223372036854775807"));
        assert_eq!(db.increment(&b("big"), 1, 0), None);
    }

    #[test]
    fn rename_overwrites_destination_of_any_type() {
        let mut db = Db::default();
        db.rpush(b("src"), b("element"));
        db.set(b("dst"), b("old"));

        db.rename(b"src", b("dst"));

        assert_eq!(db.key_type(b"src"), None);
        assert_eq!(db.key_type(b"dst"), Some(KeyType::List));
        assert_eq!(db.lrange(b"dst", 0, -1), vec![b("element")]);
        assert_index_consistent(&db);
    }

    #[test]
    fn rename_missing_source_is_a_noop() {
        let mut db = Db::default();
        db.set(b("dst"), b("kept"));

        db.rename(b"missing", b("dst"));

        assert_eq!(db.get(b"dst"), Some(&b("kept")));
    }

    #[test]
    fn keys_matching_globs() {
        let mut db = Db::default();
        db.set(b("one"), b("1"));
        db.set(b("two"), b("2"));
        db.sadd(b("three"), b("m"));

        assert_eq!(db.keys_matching("*").unwrap(), vec![b("one"), b("three"), b("two")]);
        assert_eq!(db.keys_matching("t*").unwrap(), vec![b("three"), b("two")]);
        assert_eq!(db.keys_matching("on?").unwrap(), vec![b("one")]);
        assert_eq!(db.keys_matching("[ot]*").unwrap(), vec![b("one"), b("three"), b("two")]);
        assert!(db.keys_matching("[").is_err());
    }

    #[test]
    fn sinter_counts_shared_members() {
        let mut db = Db::default();
        for member in ["a", "b", "c"] {
            db.sadd(b("s1"), b(member));
        }
        for member in ["b", "c", "d"] {
            db.sadd(b("s2"), b(member));
        }

        let keys = vec![b("s1"), b("s2")];
        assert_eq!(db.sinter(&keys), vec![b("b"), b("c")]);
    }

    #[test]
    fn store_set_replaces_and_deletes_when_empty() {
        let mut db = Db::default();
        db.set(b("dst"), b("old"));

        db.store_set(b("dst"), vec![b("m1"), b("m2")]);
        assert_eq!(db.key_type(b"dst"), Some(KeyType::Set));
        assert_eq!(db.smembers(b"dst"), Some(vec![b("m1"), b("m2")]));

        db.store_set(b("dst"), Vec::new());
        assert_eq!(db.key_type(b"dst"), None);
        assert_index_consistent(&db);
    }

    #[test]
    fn move_key_between_databases() {
        let store = Store::new();
        let mut inner = store.lock();

        inner.db_mut(0).sadd(b("k"), b("1"));

        assert!(inner.move_key(0, 1, b"k"));
        assert_eq!(inner.db(0).key_type(b"k"), None);
        assert_eq!(inner.db(1).key_type(b"k"), Some(KeyType::Set));

        // absent from source now
        assert!(!inner.move_key(0, 1, b"k"));

        // present in target
        inner.db_mut(0).set(b("k"), b("v"));
        assert!(!inner.move_key(0, 1, b"k"));
        assert_eq!(inner.db(0).key_type(b"k"), Some(KeyType::String));
    }

    #[test]
    fn flush_db_clears_one_database_only() {
        let store = Store::new();
        let mut inner = store.lock();

        inner.db_mut(0).set(b("a"), b("1"));
        inner.db_mut(1).set(b("b"), b("2"));

        inner.flush_db(0);
        assert!(inner.db(0).is_empty());
        assert_eq!(inner.db(1).len(), 1);

        inner.flush_all();
        assert!(inner.db(1).is_empty());
    }
}
