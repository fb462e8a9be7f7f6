use shelf_pathfinding::{build, find_overlap, path_length, GridError, Obstacle, PathFinder, Point};

// In this example a route is found on a small warehouse floor with shape
//  __________
// |S.........|
// |.##..##...|
// |..........|
// |.##..##...|
// |..........|
//  __________
// where # marks a shelf. The destination is the top-left cell of the last shelf, which is
// blocked, so the route ends on the free cell above it.

fn main() -> Result<(), GridError> {
    let mut shelves: Vec<Obstacle> = Vec::new();
    for candidate in [
        Obstacle::new(1, 1, 2, 1),
        Obstacle::new(5, 1, 2, 1),
        Obstacle::new(1, 3, 2, 1),
        Obstacle::new(2, 3, 2, 1),
        Obstacle::new(5, 3, 2, 1),
    ] {
        match find_overlap(&candidate, &shelves, None) {
            Some(ix) => println!("Rejected {:?}, it overlaps {:?}", candidate, shelves[ix]),
            None => shelves.push(candidate),
        }
    }
    let grid = build(10, 5, &shelves)?;
    println!("{}", grid);

    let start = Point::new(0, 0);
    let target = shelves[shelves.len() - 1];
    let path = PathFinder::new().route(start, Point::new(target.x, target.y), &grid)?;
    match path_length(&path) {
        Some(steps) => {
            println!("Path of {} steps:", steps);
            for p in path {
                println!("{:?}", p);
            }
        }
        None => println!("No path found"),
    }
    Ok(())
}
