use core::ptr::NonNull;

use uniq_mem::{
    factory::Factory,
    impl_upcast, make_unique, make_unique_in,
    policy::{AllocDestroy, Create, DefaultCreate, DefaultDestroy, Logged, TryCreateFn},
    CreateError, GlobalAlloc, Null, Unique,
};

use uniq_log::{info, warn, error};

trait Sensor {
    fn name(&self) -> &str;
    fn read(&mut self) -> f32;
}

struct Thermometer {
    celsius: f32,
}

struct Counter {
    label: String,
    ticks: u32,
}

impl Sensor for Thermometer {

    fn name(&self) -> &str {
        "thermometer"
    }

    fn read(&mut self) -> f32 {
        self.celsius += 0.5;
        self.celsius
    }
}

impl Sensor for Counter {

    fn name(&self) -> &str {
        &self.label
    }

    fn read(&mut self) -> f32 {
        self.ticks += 1;
        self.ticks as f32
    }
}

impl Drop for Counter {

    fn drop(&mut self) {
        info!("counter {} stopped after {} ticks", self.label, self.ticks);
    }
}

impl_upcast!(
    Thermometer => dyn Sensor,
    Counter => dyn Sensor,
);

fn reclaim(ptr: NonNull<[u8; 64]>) {
    info!("wiping buffer at {:p}", ptr);
    let mut buf = unsafe { Box::from_raw(ptr.as_ptr()) };
    buf.fill(0);
}

fn main() {
    uniq_log::init();

    let mut sensors: Vec<Unique<dyn Sensor, Logged<DefaultDestroy>>> = Vec::new();
    let factory = unsafe {
        Factory::<Thermometer, Logged<DefaultCreate>, Logged<DefaultDestroy>>::from_defaults()
    };
    sensors.push(factory.make((Thermometer { celsius: 20.0 },)).upcast());
    let counter = unsafe {
        Factory::new()
            .create_with(Logged::named(DefaultCreate, "counter"))
            .destroy_with(Logged::named(DefaultDestroy, "counter"))
    }.make((Counter { label: "door".into(), ticks: 0 },));
    let watched = counter.get();
    sensors.push(counter.upcast());

    for _ in 0..3 {
        for sensor in &mut sensors {
            let value = sensor.read();
            info!("{} reads {}", sensor.name(), value);
        }
    }
    if let Some(counter) = unsafe { watched.as_ref() } {
        info!("observed counter {} is at {}", counter.label, counter.ticks);
    }

    let mut last = sensors.pop().unwrap_or_default();
    let mut spare: Unique<dyn Sensor, Logged<DefaultDestroy>> = Unique::default();
    spare.swap(&mut last);
    info!("spare {:?}, last {:?}", spare, last);
    if last == Null {
        warn!("last slot is empty after swap");
    }
    spare.reset();

    let buffer = unsafe {
        Factory::new().destroy_with(reclaim as fn(NonNull<[u8; 64]>))
    }.make(([0xAAu8; 64],));
    info!("buffer starts with {:#x}", buffer[0]);
    drop(buffer);

    match make_unique_in(&GlobalAlloc, [1u64; 8]) {
        Ok(block) => {
            info!("block of {} words at {:?}", block.len(), block.get());
        },
        Err(err) => {
            error!("{}", err);
        },
    }

    let refused = unsafe {
        Factory::new()
            .create_with(TryCreateFn(|len: usize| {
                if len > 1024 {
                    Err(CreateError::InvalidLayout { size: len, align: 1 })
                } else {
                    DefaultCreate.create((vec![0u8; len],))
                }
            }))
            .destroy_with(AllocDestroy::new(&GlobalAlloc))
    }.try_make((4096,));
    if let Err(err) = refused {
        warn!("oversized request refused: {}", err);
    }

    let greeting = make_unique(String::from("done"));
    info!("{}", *greeting);
}
