//! A counting test double for the RTTI library.
//!
//! Tracks native reference counts, records every call and lets tests script
//! iterator sequences and failures.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use rtti::ffi::*;
use rtti::{ClassKind, Gateway, Handle, Rtti};

/// One step of a scripted animal iterator.
#[derive(Debug, Clone)]
pub enum Step {
    /// Hand out a new animal with the given class type id and name.
    Animal(u64, &'static str),
    /// Hand out another reference to an existing instance.
    Existing(Handle),
    /// End of sequence (null handle).
    End,
    /// Fail with a status code and a recorded message.
    Fail(RttiResult, &'static str),
}

struct MockObject {
    type_id: u64,
    refcount: i64,
    name: String,
    last_error: Option<String>,
    steps: VecDeque<Step>,
}

#[derive(Default)]
struct State {
    next_handle: usize,
    objects: HashMap<Handle, MockObject>,
    version: (u32, u32, u32),
    calls: HashMap<&'static str, usize>,
    failures: HashMap<&'static str, (RttiResult, &'static str)>,
    null_results: HashSet<&'static str>,
    zoo_animals: Vec<Step>,
    last_error_buffer_sizes: Vec<usize>,
}

pub struct MockGateway {
    state: Mutex<State>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_handle: 0x1000,
                version: (1, 0, 0),
                ..Default::default()
            }),
        })
    }

    /// A binding over `mock` with the version check enabled.
    pub fn bind(mock: &Arc<Self>) -> Rtti {
        Rtti::with_gateway(mock.clone()).expect("binding to the mock should succeed")
    }

    pub fn set_version(&self, major: u32, minor: u32, micro: u32) {
        self.state.lock().version = (major, minor, micro);
    }

    /// Animals handed out by iterators of zoos created afterwards.
    pub fn set_zoo_animals(&self, steps: Vec<Step>) {
        self.state.lock().zoo_animals = steps;
    }

    /// Make the next call to `export` fail with `code`, recording `message`
    /// on the instance the call was made on.
    pub fn fail_next(&self, export: &'static str, code: RttiResult, message: &'static str) {
        self.state.lock().failures.insert(export, (code, message));
    }

    /// Make the next call to `export` succeed without handing out an
    /// instance.
    pub fn null_next(&self, export: &'static str) {
        self.state.lock().null_results.insert(export);
    }

    /// Create an instance holding one reference, as a native factory would.
    pub fn add_object(&self, type_id: u64, name: &str) -> Handle {
        let mut state = self.state.lock();
        state.new_object(type_id, name, VecDeque::new())
    }

    pub fn add_kind(&self, kind: ClassKind, name: &str) -> Handle {
        self.add_object(kind.type_id(), name)
    }

    pub fn add_iterator(&self, steps: Vec<Step>) -> Handle {
        let mut state = self.state.lock();
        state.new_object(ClassKind::AnimalIterator.type_id(), "", steps.into())
    }

    /// Simulate the library handing out one more reference to `handle`.
    pub fn add_ref(&self, handle: Handle) {
        if let Some(obj) = self.state.lock().objects.get_mut(&handle) {
            obj.refcount += 1;
        }
    }

    /// Current native reference count; 0 once the instance is freed.
    pub fn refcount(&self, handle: Handle) -> i64 {
        self.state
            .lock()
            .objects
            .get(&handle)
            .map(|o| o.refcount)
            .unwrap_or(0)
    }

    pub fn alive(&self) -> usize {
        self.state.lock().objects.len()
    }

    pub fn calls(&self, export: &str) -> usize {
        self.state.lock().calls.get(export).copied().unwrap_or(0)
    }

    pub fn last_error_buffer_sizes(&self) -> Vec<usize> {
        self.state.lock().last_error_buffer_sizes.clone()
    }
}

impl State {
    fn new_object(&mut self, type_id: u64, name: &str, steps: VecDeque<Step>) -> Handle {
        self.next_handle += 0x10;
        let handle = Handle::from_raw(self.next_handle);
        self.objects.insert(
            handle,
            MockObject {
                type_id,
                refcount: 1,
                name: name.to_string(),
                last_error: None,
                steps,
            },
        );
        handle
    }

    /// Count the call and apply a scripted failure, if any.
    fn enter(&mut self, export: &'static str, instance: Handle) -> Option<RttiResult> {
        *self.calls.entry(export).or_insert(0) += 1;
        let (code, message) = self.failures.remove(export)?;
        if let Some(obj) = self.objects.get_mut(&instance) {
            obj.last_error = Some(message.to_string());
        }
        Some(code)
    }

    fn write_string(value: &str, buffer: &mut [u8], needed: &mut u32) -> RttiResult {
        let bytes = value.as_bytes();
        *needed = bytes.len() as u32 + 1;
        if buffer.is_empty() {
            return RTTI_SUCCESS;
        }
        if buffer.len() < bytes.len() + 1 {
            return RTTI_ERROR_BUFFERTOOSMALL;
        }
        buffer[..bytes.len()].copy_from_slice(bytes);
        buffer[bytes.len()] = 0;
        RTTI_SUCCESS
    }
}

impl Gateway for MockGateway {
    fn class_type_id(&self, instance: Handle, class_type_id: &mut u64) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_BASE_CLASSTYPEID, instance) {
            return code;
        }
        match state.objects.get(&instance) {
            Some(obj) => {
                *class_type_id = obj.type_id;
                RTTI_SUCCESS
            }
            None => RTTI_ERROR_INVALIDPARAM,
        }
    }

    fn animal_name(&self, animal: Handle, buffer: &mut [u8], needed: &mut u32) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_ANIMAL_NAME, animal) {
            return code;
        }
        match state.objects.get(&animal) {
            Some(obj) => State::write_string(&obj.name, buffer, needed),
            None => RTTI_ERROR_INVALIDPARAM,
        }
    }

    fn tiger_roar(&self, tiger: Handle) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_TIGER_ROAR, tiger) {
            return code;
        }
        match state.objects.get(&tiger) {
            Some(obj) if obj.type_id == ClassKind::Tiger.type_id() => RTTI_SUCCESS,
            Some(_) => RTTI_ERROR_INVALIDCAST,
            None => RTTI_ERROR_INVALIDPARAM,
        }
    }

    fn animal_iterator_get_next_animal(
        &self,
        iterator: Handle,
        animal: &mut Handle,
    ) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_ANIMALITERATOR_GETNEXTANIMAL, iterator) {
            return code;
        }
        let step = match state.objects.get_mut(&iterator) {
            Some(obj) => obj.steps.pop_front().unwrap_or(Step::End),
            None => return RTTI_ERROR_INVALIDPARAM,
        };
        match step {
            Step::Animal(type_id, name) => {
                *animal = state.new_object(type_id, name, VecDeque::new());
                RTTI_SUCCESS
            }
            Step::Existing(handle) => {
                if let Some(obj) = state.objects.get_mut(&handle) {
                    obj.refcount += 1;
                }
                *animal = handle;
                RTTI_SUCCESS
            }
            Step::End => {
                *animal = Handle::null();
                RTTI_SUCCESS
            }
            Step::Fail(code, message) => {
                if let Some(obj) = state.objects.get_mut(&iterator) {
                    obj.last_error = Some(message.to_string());
                }
                code
            }
        }
    }

    fn zoo_iterator(&self, zoo: Handle, iterator: &mut Handle) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_ZOO_ITERATOR, zoo) {
            return code;
        }
        if !state.objects.contains_key(&zoo) {
            return RTTI_ERROR_INVALIDPARAM;
        }
        if state.null_results.remove(EXPORT_ZOO_ITERATOR) {
            *iterator = Handle::null();
            return RTTI_SUCCESS;
        }
        let steps = state.zoo_animals.clone().into();
        *iterator = state.new_object(ClassKind::AnimalIterator.type_id(), "", steps);
        RTTI_SUCCESS
    }

    fn get_version(&self, major: &mut u32, minor: &mut u32, micro: &mut u32) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_GETVERSION, Handle::null()) {
            return code;
        }
        (*major, *minor, *micro) = state.version;
        RTTI_SUCCESS
    }

    fn get_last_error(
        &self,
        instance: Handle,
        buffer: &mut [u8],
        needed: &mut u32,
        has_error: &mut bool,
    ) -> RttiResult {
        let mut state = self.state.lock();
        *state.calls.entry(EXPORT_GETLASTERROR).or_insert(0) += 1;
        state.last_error_buffer_sizes.push(buffer.len());
        if let Some((code, _)) = state.failures.remove(EXPORT_GETLASTERROR) {
            return code;
        }
        match state.objects.get(&instance) {
            Some(obj) => {
                *has_error = obj.last_error.is_some();
                let message = obj.last_error.clone().unwrap_or_default();
                State::write_string(&message, buffer, needed)
            }
            None => RTTI_ERROR_INVALIDPARAM,
        }
    }

    fn acquire_instance(&self, instance: Handle) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_ACQUIREINSTANCE, instance) {
            return code;
        }
        match state.objects.get_mut(&instance) {
            Some(obj) => {
                obj.refcount += 1;
                RTTI_SUCCESS
            }
            None => RTTI_ERROR_INVALIDPARAM,
        }
    }

    fn release_instance(&self, instance: Handle) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_RELEASEINSTANCE, instance) {
            return code;
        }
        let freed = match state.objects.get_mut(&instance) {
            Some(obj) => {
                obj.refcount -= 1;
                obj.refcount == 0
            }
            None => return RTTI_ERROR_INVALIDPARAM,
        };
        if freed {
            state.objects.remove(&instance);
        }
        RTTI_SUCCESS
    }

    fn create_zoo(&self, instance: &mut Handle) -> RttiResult {
        let mut state = self.state.lock();
        if let Some(code) = state.enter(EXPORT_CREATEZOO, Handle::null()) {
            return code;
        }
        if state.null_results.remove(EXPORT_CREATEZOO) {
            *instance = Handle::null();
            return RTTI_SUCCESS;
        }
        *instance = state.new_object(ClassKind::Zoo.type_id(), "", VecDeque::new());
        RTTI_SUCCESS
    }
}
