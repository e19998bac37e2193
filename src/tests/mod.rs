mod array;
mod hash;
mod view;
