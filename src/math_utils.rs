//! Ellipse geometry shared by the text layout, shapes and security pattern.

/// Point on an axis-aligned ellipse at parametric angle `theta`.
pub fn ellipse_point<T>(center: (T, T), radius_x: T, radius_y: T, theta: T) -> (T, T)
where
    T: num_traits::Float,
{
    (
        center.0 + radius_x * theta.cos(),
        center.1 + radius_y * theta.sin(),
    )
}

/// Endpoints of a segment of `length` centred on `anchor`, pointing along `angle`.
pub fn centered_segment<T>(anchor: (T, T), length: T, angle: T) -> ((T, T), (T, T))
where
    T: num_traits::Float,
{
    let two = T::one() + T::one();
    let half = length / two;
    let (dx, dy) = (half * angle.cos(), half * angle.sin());
    ((anchor.0 - dx, anchor.1 - dy), (anchor.0 + dx, anchor.1 + dy))
}

/// Calculate distance between two points
pub fn distance<T>(p1: (T, T), p2: (T, T)) -> T
where
    T: num_traits::Float,
{
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    (dx * dx + dy * dy).sqrt()
}
