pub mod ring {
    tonic::include_proto!("ring");
}

mod conversions;
