//! Factory call shapes, custom policies and creation failures.

mod common;

use std::{
    cell::{Cell, RefCell},
    ptr::NonNull,
    rc::Rc,
};

use uniq_mem::{
    factory::Factory,
    make_unique_default, make_unique_in,
    policy::{Create, Destroy, DefaultCreate, AllocCreate, AllocDestroy, TryCreateFn},
    CreateError, Unique,
};

#[cfg(feature = "log")]
use uniq_mem::{
    policy::{DefaultDestroy, Logged},
    GlobalAlloc,
};

use common::{CountingAlloc, CountingDestroy, DropLog, FailingAlloc, Tracked};

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

fn boxed<T>(value: T) -> NonNull<T> {
    NonNull::from(Box::leak(Box::new(value)))
}

fn unbox<T: ?Sized>(ptr: NonNull<T>) {
    drop(unsafe { Box::from_raw(ptr.as_ptr()) })
}

#[test]
fn custom_creator_yields_its_instance() {
    let sentinel = boxed(Point { x: 3, y: 4 });
    let handle = unsafe {
        Factory::new().create_with(move || sentinel)
    }.make(());
    assert_eq!(handle.as_ptr(), Some(sentinel));
    assert_eq!(*handle, Point { x: 3, y: 4 });
}

#[test]
fn custom_destroyer_runs_once_with_held_pointer() {
    let alloc = CountingAlloc::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let recorder = {
        let seen = seen.clone();
        let alloc = &alloc;
        move |ptr: NonNull<Point>| {
            seen.borrow_mut().push(ptr);
            unsafe { AllocDestroy::new(alloc).destroy(ptr) }
        }
    };
    let handle = unsafe {
        Factory::new()
            .create_with(AllocCreate::new(&alloc))
            .destroy_with(recorder)
    }.make((Point { x: 1, y: 2 },));
    let held = handle.as_ptr().unwrap();
    assert!(seen.borrow().is_empty());

    drop(handle);
    assert_eq!(*seen.borrow(), [held]);
    assert_eq!(alloc.allocs.get(), 1);
    assert_eq!(alloc.frees.get(), 1);
    assert_eq!(alloc.live_bytes.get(), 0);
}

#[test]
fn fn_pointer_destroyer_with_default_creator() {
    static DESTROYED: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
    fn destroy(ptr: NonNull<Point>) {
        DESTROYED.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        unbox(ptr);
    }
    let handle: Unique<Point, fn(NonNull<Point>)> = unsafe {
        Factory::new().destroy_with(destroy as fn(NonNull<Point>))
    }.make((Point { x: -1, y: 1 },));
    assert_eq!(handle.x, -1);
    drop(handle);
    assert_eq!(DESTROYED.load(std::sync::atomic::Ordering::Relaxed), 1);
}

#[test]
fn creator_and_destroyer_functions_with_forwarded_args() {
    fn build(x: i32, y: i32) -> NonNull<Point> {
        boxed(Point { x, y })
    }
    let factory = unsafe {
        Factory::new()
            .create_with(build as fn(i32, i32) -> NonNull<Point>)
            .destroy_with(unbox::<Point> as fn(NonNull<Point>))
    };
    let handle = factory.clone().make((5, 6));
    let other = factory.make((7, 8));
    assert_eq!(*handle, Point { x: 5, y: 6 });
    assert_eq!(*other, Point { x: 7, y: 8 });
}

#[test]
fn single_argument_creator_closure() {
    let calls = Cell::new(0);
    let handle = unsafe {
        Factory::new().create_with(|name: &'static str| {
            calls.set(calls.get() + 1);
            boxed(name.len())
        })
    }.make(("seven",));
    assert_eq!(*handle, 5);
    assert_eq!(calls.get(), 1);
}

#[derive(Default)]
struct ZeroedCreate;

impl Create<[u8; 16], ()> for ZeroedCreate {

    type Error = CreateError;

    fn create(&mut self, _: ()) -> Result<NonNull<[u8; 16]>, CreateError> {
        DefaultCreate.create(([0; 16],))
    }
}

#[test]
fn default_constructed_functor_policies() {
    let mut handle = unsafe {
        Factory::<[u8; 16], ZeroedCreate, CountingDestroy>::from_defaults()
    }.make(());
    handle[0] = 1;
    assert_eq!(handle.iter().map(|&b| b as u32).sum::<u32>(), 1);
    let destroy = handle.destroyer().clone();
    drop(handle);
    assert_eq!(destroy.calls(), 1);
}

#[test]
fn default_value_shape() {
    let handle = make_unique_default::<Vec<u8>>();
    assert!(handle.is_empty());
    let handle: Unique<Point, _> = unsafe {
        Factory::new().destroy_with(CountingDestroy::default())
    }.make((Point { x: 0, y: 0 },));
    assert_eq!(handle.y, 0);
}

#[test]
fn allocator_backed_handles_return_memory() {
    let alloc = CountingAlloc::default();
    {
        let handle = make_unique_in(&alloc, [7u64; 4]).unwrap();
        assert_eq!(handle[3], 7);
        assert_eq!(alloc.allocs.get(), 1);
        assert_eq!(alloc.live_bytes.get(), 32);
        assert_eq!(alloc.frees.get(), 0);
    }
    assert_eq!(alloc.frees.get(), 1);
    assert_eq!(alloc.live_bytes.get(), 0);

    let unit = make_unique_in(&alloc, ()).unwrap();
    drop(unit);
    assert_eq!(alloc.allocs.get(), 1);
    assert_eq!(alloc.frees.get(), 1);
}

#[test]
fn memory_goes_back_to_the_allocator_it_came_from() {
    let home = CountingAlloc::default();

    // creator and destroyer share `home`
    let mut handle = unsafe {
        Factory::new()
            .create_with(AllocCreate::new(&home))
            .destroy_with(AllocDestroy::new(&home))
    }.make(([7u64; 4],));
    assert_eq!(home.live_bytes.get(), 32);

    // a replacement policy has to keep freeing into `home`
    let alloc = handle.destroyer().alloc();
    unsafe {
        *handle.destroyer_mut() = AllocDestroy::new(alloc);
    }
    drop(handle);

    assert_eq!(home.allocs.get(), 1);
    assert_eq!(home.frees.get(), 1);
    assert_eq!(home.live_bytes.get(), 0);
}

#[test]
fn allocation_failure_produces_no_handle() {
    let log = DropLog::default();
    let res = make_unique_in(&FailingAlloc, Tracked::new("unplaced", &log));
    let err = res.err().unwrap();
    assert_eq!(err, CreateError::AllocFailed {
        size: size_of::<Tracked>(),
        align: align_of::<Tracked>(),
    });
    assert_eq!(*log.borrow(), ["unplaced"]);
    assert_eq!(err.to_string(), format!(
        "allocation of {} bytes with alignment {} failed",
        size_of::<Tracked>(),
        align_of::<Tracked>(),
    ));
}

#[test]
fn creation_error_is_returned_and_nothing_is_destroyed() {
    let destroy = CountingDestroy::default();
    let res = unsafe {
        Factory::new()
            .create_with(TryCreateFn(|| Err::<NonNull<u32>, _>("exhausted")))
            .destroy_with(destroy.clone())
    }.try_make(());
    assert_eq!(res.err(), Some("exhausted"));
    assert_eq!(destroy.calls(), 0);
}

#[test]
fn fallible_creator_success() {
    let res = unsafe {
        Factory::new().create_with(TryCreateFn(|x: u32| -> Result<NonNull<u32>, CreateError> {
            DefaultCreate.create((x * 2,))
        }))
    }.try_make((21,));
    assert_eq!(*res.unwrap(), 42);
}

#[test]
#[should_panic(expected = "creation failed: exhausted")]
fn make_panics_on_creation_failure() {
    let _ = unsafe {
        Factory::new().create_with(TryCreateFn(|| Err::<NonNull<u32>, _>("exhausted")))
    }.make(());
}

#[cfg(feature = "log")]
#[test]
fn logged_policies_forward() {
    uniq_log::init_with_filter("uniq_mem=trace");
    assert!(uniq_log::is_initialized());

    // records from the policy module pass the filter and reach stderr
    let target = "uniq_mem::policy::logged";
    let filter = uniq_log::Filter::parse("uniq_mem=trace");
    assert!(filter.enabled(target, uniq_log::Level::Trace));
    assert!(!filter.enabled("other_crate", uniq_log::Level::Debug));
    let written = uniq_log::log(target, uniq_log::LevelFmt::Trace, format_args!("created value"));
    assert!(matches!(written, Ok(true)));
    let dropped = uniq_log::log("other_crate", uniq_log::LevelFmt::Debug, format_args!("hidden"));
    assert!(matches!(dropped, Ok(false)));

    let handle = unsafe {
        Factory::<u32, Logged<DefaultCreate>, Logged<DefaultDestroy>>::from_defaults()
    }.make((11,));
    assert_eq!(*handle, 11);
    drop(handle);

    let counter = CountingDestroy::default();
    let handle = unsafe {
        Factory::new().destroy_with(Logged::named(counter.clone(), "point"))
    }.make((Point { x: 2, y: 2 },));
    assert_eq!(handle.destroyer().inner().calls(), 0);
    drop(handle);
    assert_eq!(counter.calls(), 1);
}

#[cfg(feature = "log")]
#[test]
fn logged_creator_passes_failures_through() {
    let res = unsafe {
        Factory::new()
            .create_with(Logged::new(AllocCreate::new(&FailingAlloc)))
            .destroy_with(AllocDestroy::new(&GlobalAlloc))
    }.try_make((1u16,));
    assert_eq!(res.err(), Some(CreateError::AllocFailed { size: 2, align: 2 }));
}
