//! 简单的容器测试
//!
//! 对应最基本的使用方式：注册两个命名绑定并解析

#![allow(clippy::uninlined_format_args)]

use bindery::{ContainerError, ServiceContainer};
use std::fmt;

#[derive(Debug, Default, PartialEq)]
struct Car {
    wheels: u8,
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Car with {} wheels", self.wheels)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Ship {
    name: String,
}

fn container_with_vehicles() -> ServiceContainer {
    let container = ServiceContainer::new();
    container.bind("car", |_| Ok(Car { wheels: 4 }));
    container.bind("ship", |_| {
        Ok(Ship {
            name: "Endeavour".to_string(),
        })
    });
    container
}

#[test]
fn test_resolves_car_and_ship() {
    let container = container_with_vehicles();

    let car = container.make::<Car>("car").unwrap();
    let ship = container.make::<Ship>("ship").unwrap();

    assert_eq!(*car, Car { wheels: 4 });
    assert_eq!(ship.name, "Endeavour");
    assert_eq!(car.to_string(), "Car with 4 wheels");
}

#[test]
fn test_truck_is_not_bound() {
    let container = container_with_vehicles();

    let result = container.make::<Car>("truck");

    match result {
        Err(ContainerError::UnresolvedBinding { name, available }) => {
            assert_eq!(name, "truck");
            assert_eq!(available, vec!["car", "ship"]);
        }
        other => panic!("expected UnresolvedBinding, got {:?}", other),
    }
}

#[test]
fn test_bound_names() {
    let container = container_with_vehicles();

    assert!(container.bound("car"));
    assert!(container.bound("ship"));
    assert!(!container.bound("truck"));
    assert_eq!(container.names(), vec!["car", "ship"]);
}

#[test]
fn test_make_any_is_opaque() {
    let container = container_with_vehicles();

    let car = container.make_any("car").unwrap();
    assert!(car.downcast_ref::<Car>().is_some());
    assert!(car.downcast_ref::<Ship>().is_none());
}
